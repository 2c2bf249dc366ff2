//! Productivity index and future-performance projection
//!
//! Present productivity index (PI) plus the Standing/Eckmeir and
//! Fetkovich analogs for projecting deliverability to a declined
//! reservoir pressure. All projection operations require the future
//! reservoir state to have been derived via
//! [`Well::set_production_change`] first.
//!
//! Projection families:
//! - Standing/Eckmeir (Vogel analogs): PI scales with the squared
//!   pressure ratio; Eckmeir declines rates cubically.
//! - Fetkovich: PI built directly from the fitted deliverability
//!   exponent and scaled linearly with the pressure ratio.

use tracing::debug;

use crate::deliverability::check_inputs;
use crate::equations::vogel_flow_ratio;
use crate::error::IprError;
use crate::regression::fit_fetkovich;
use crate::types::{ProductionDataset, ProjectionMethod, TestPoint, Well};

impl Well {
    /// Uncorrected productivity index from the Vogel AOF:
    /// `j = 1.8 * q_max / p_res`.
    fn production_index(&self, point: &TestPoint) -> Result<f64, IprError> {
        let q_max = self.q_max_at(self.p_res(), point)?;
        Ok(1.8 * q_max / self.p_res())
    }

    /// Present productivity index for the chosen projection family.
    ///
    /// Vogel-family (standing/eckmeir):
    /// `j_p = j / j_r` with `j_r = (1/1.8) * (1 + 0.8 * p/p_res)`.
    ///
    /// Fetkovich: `j_p = q / (p_res² - p²)^n` using the fitted exponent.
    pub fn present_pi(&self, method: ProjectionMethod, point: &TestPoint) -> Result<f64, IprError> {
        check_inputs(self.p_res(), point)?;

        match method {
            ProjectionMethod::Standing | ProjectionMethod::Eckmeir => {
                let j = self.production_index(point)?;
                let j_r = 1.0 / 1.8 * (1.0 + 0.8 * (point.p / self.p_res()));
                Ok(j / j_r)
            }
            ProjectionMethod::Fetkovich => {
                let fit = fit_fetkovich(&self.dataset, self.p_res())?;
                let drawdown_squared = self.p_res() * self.p_res() - point.p * point.p;
                if drawdown_squared <= 0.0 {
                    return Err(IprError::domain(
                        "fetkovich productivity index",
                        format!("p_res² - p² must be positive, got {drawdown_squared}"),
                    ));
                }
                Ok(point.q / drawdown_squared.powf(fit.n))
            }
        }
    }

    /// Future productivity index at the declined reservoir pressure.
    ///
    /// Vogel-family: `j_f = j_p * (future_p_res / p_res)²`.
    /// Fetkovich:    `j_f = j_p * (future_p_res / p_res)`.
    pub fn future_pi(&self, method: ProjectionMethod, point: &TestPoint) -> Result<f64, IprError> {
        let future_p_res = self.reservoir.future_p_res()?;
        let j_p = self.present_pi(method, point)?;
        let pressure_ratio = future_p_res / self.p_res();

        let j_f = match method {
            ProjectionMethod::Standing | ProjectionMethod::Eckmeir => {
                j_p * pressure_ratio * pressure_ratio
            }
            ProjectionMethod::Fetkovich => j_p * pressure_ratio,
        };

        debug!(%method, j_p, j_f, future_p_res, "projected productivity index");
        Ok(j_f)
    }

    /// Flow rate the test point projects to at the future reservoir
    /// pressure.
    ///
    /// Standing:  `q_f = (j_f * future_p_res / 1.8) * Vogel(p, future_p_res)`
    /// Eckmeir:   `q_f = (future_p_res / p_res)³ * q`
    /// Fetkovich: `q_f = j_f * (future_p_res² - p²)^n`
    pub fn future_q(&self, method: ProjectionMethod, point: &TestPoint) -> Result<f64, IprError> {
        let future_p_res = self.reservoir.future_p_res()?;
        check_inputs(self.p_res(), point)?;

        match method {
            ProjectionMethod::Standing => {
                let j_f = self.future_pi(method, point)?;
                Ok(j_f * future_p_res / 1.8 * vogel_flow_ratio(point.p, future_p_res))
            }
            ProjectionMethod::Eckmeir => {
                let decline = future_p_res / self.p_res();
                Ok(decline.powi(3) * point.q)
            }
            ProjectionMethod::Fetkovich => {
                let fit = fit_fetkovich(&self.dataset, self.p_res())?;
                let j_f = self.future_pi(method, point)?;
                let drawdown_squared = future_p_res * future_p_res - point.p * point.p;
                if drawdown_squared < 0.0 {
                    return Err(IprError::domain(
                        "fetkovich future rate",
                        format!(
                            "flowing pressure {} exceeds future reservoir pressure {future_p_res}",
                            point.p
                        ),
                    ));
                }
                Ok(j_f * drawdown_squared.powf(fit.n))
            }
        }
    }

    /// Maximum flow rate at the future reservoir pressure.
    ///
    /// Standing re-applies Vogel at `future_p_res` to the projected rate;
    /// Eckmeir scales the present AOF cubically; Fetkovich takes the
    /// `p = 0` limit of the future-rate formula.
    pub fn future_q_max(&self, method: ProjectionMethod, point: &TestPoint) -> Result<f64, IprError> {
        let future_p_res = self.reservoir.future_p_res()?;

        match method {
            ProjectionMethod::Standing => {
                let future_q = self.future_q(method, point)?;
                self.q_max_at(future_p_res, &TestPoint::new(future_q, point.p))
            }
            ProjectionMethod::Eckmeir => {
                let decline = future_p_res / self.p_res();
                let present_q_max = self.q_max_at(self.p_res(), point)?;
                Ok(decline.powi(3) * present_q_max)
            }
            ProjectionMethod::Fetkovich => {
                let fit = fit_fetkovich(&self.dataset, self.p_res())?;
                let j_f = self.future_pi(method, point)?;
                Ok(j_f * (future_p_res * future_p_res).powf(fit.n))
            }
        }
    }

    /// Project every recorded test point to its future rate, keeping the
    /// observed flowing pressures. Pure function of the current state; the
    /// caller decides whether to insert the result anywhere.
    pub fn future_dataset(&self, method: ProjectionMethod) -> Result<ProductionDataset, IprError> {
        self.dataset
            .iter()
            .map(|point| {
                self.future_q(method, point)
                    .map(|q| TestPoint::new(q, point.p))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TestPoint;

    fn declined_well() -> Well {
        let mut well = Well::new(1734.0);
        well.insert([
            TestPoint::new(252.0, 1653.0),
            TestPoint::new(516.0, 1507.0),
            TestPoint::new(768.0, 1335.0),
        ]);
        well.set_production_change(0.2);
        well
    }

    #[test]
    fn test_standing_present_pi_reference_case() {
        let well = declined_well();
        let j_p = well
            .present_pi(ProjectionMethod::Standing, &TestPoint::new(768.0, 1335.0))
            .unwrap();
        assert!((j_p - 2.388_335).abs() < 1e-5, "j_p = {j_p}");
    }

    #[test]
    fn test_vogel_family_future_pi_scales_by_squared_ratio() {
        let well = declined_well();
        let point = TestPoint::new(768.0, 1335.0);

        // production_change = 0.2 gives (1387.2 / 1734)² = 0.64 exactly.
        for method in [ProjectionMethod::Standing, ProjectionMethod::Eckmeir] {
            let j_p = well.present_pi(method, &point).unwrap();
            let j_f = well.future_pi(method, &point).unwrap();
            assert!((j_f - j_p * 0.64).abs() < 1e-9, "{method}: j_f = {j_f}");
        }
    }

    #[test]
    fn test_standing_future_rate_reference_case() {
        let well = declined_well();
        let future_q = well
            .future_q(ProjectionMethod::Standing, &TestPoint::new(768.0, 1335.0))
            .unwrap();
        assert!((future_q - 78.455_07).abs() < 1e-3, "future_q = {future_q}");
    }

    #[test]
    fn test_standing_future_rate_above_future_pressure_floors_to_epsilon() {
        // p = 1653 exceeds future_p_res = 1387.2, so the Vogel term hits
        // its epsilon floor and the projected rate collapses toward zero.
        let well = declined_well();
        let future_q = well
            .future_q(ProjectionMethod::Standing, &TestPoint::new(252.0, 1653.0))
            .unwrap();
        assert!(future_q > 0.0 && future_q < 0.01, "future_q = {future_q}");
    }

    #[test]
    fn test_eckmeir_cubic_decline() {
        let well = declined_well();
        let point = TestPoint::new(768.0, 1335.0);

        // (1387.2 / 1734)³ = 0.512
        let future_q = well.future_q(ProjectionMethod::Eckmeir, &point).unwrap();
        assert!((future_q - 393.216).abs() < 1e-9, "future_q = {future_q}");

        let future_q_max = well.future_q_max(ProjectionMethod::Eckmeir, &point).unwrap();
        assert!((future_q_max - 1057.519).abs() < 1e-3, "future_q_max = {future_q_max}");
    }

    #[test]
    fn test_fetkovich_projection_reference_case() {
        let well = declined_well();
        let point = TestPoint::new(768.0, 1335.0);

        let j_p = well.present_pi(ProjectionMethod::Fetkovich, &point).unwrap();
        assert!((j_p - 4.846_164e-6).abs() < 1e-10, "j_p = {j_p}");

        let j_f = well.future_pi(ProjectionMethod::Fetkovich, &point).unwrap();
        assert!((j_f - j_p * 0.8).abs() < 1e-15, "j_f = {j_f}");

        let future_q = well.future_q(ProjectionMethod::Fetkovich, &point).unwrap();
        assert!((future_q - 33.773_58).abs() < 1e-3, "future_q = {future_q}");
    }

    #[test]
    fn test_fetkovich_future_rate_rejects_pressure_above_future_p_res() {
        let well = declined_well();
        assert!(matches!(
            well.future_q(ProjectionMethod::Fetkovich, &TestPoint::new(252.0, 1653.0)),
            Err(IprError::Domain(..))
        ));
    }

    #[test]
    fn test_future_decline_ordering() {
        let well = declined_well();
        let point = TestPoint::new(768.0, 1335.0);

        for method in [
            ProjectionMethod::Standing,
            ProjectionMethod::Eckmeir,
            ProjectionMethod::Fetkovich,
        ] {
            let j_p = well.present_pi(method, &point).unwrap();
            let j_f = well.future_pi(method, &point).unwrap();
            assert!(j_f <= j_p, "{method}: future PI must not exceed present PI");
        }
    }

    #[test]
    fn test_projection_requires_future_state() {
        let mut well = Well::new(1734.0);
        well.insert([
            TestPoint::new(252.0, 1653.0),
            TestPoint::new(768.0, 1335.0),
        ]);
        let point = TestPoint::new(768.0, 1335.0);

        assert!(matches!(
            well.future_pi(ProjectionMethod::Standing, &point),
            Err(IprError::FutureStateNotSet)
        ));
        assert!(matches!(
            well.future_q(ProjectionMethod::Eckmeir, &point),
            Err(IprError::FutureStateNotSet)
        ));
        assert!(matches!(
            well.future_q_max(ProjectionMethod::Fetkovich, &point),
            Err(IprError::FutureStateNotSet)
        ));

        // Present PI works without any future state.
        assert!(well.present_pi(ProjectionMethod::Standing, &point).is_ok());
    }

    #[test]
    fn test_fetkovich_present_pi_rejects_static_pressure_point() {
        let well = declined_well();
        assert!(matches!(
            well.present_pi(ProjectionMethod::Fetkovich, &TestPoint::new(100.0, 1734.0)),
            Err(IprError::Domain(..))
        ));
    }

    #[test]
    fn test_future_dataset_projects_every_point() {
        let well = declined_well();
        let projected = well.future_dataset(ProjectionMethod::Eckmeir).unwrap();

        assert_eq!(projected.len(), well.dataset.len());
        for (original, future) in well.dataset.iter().zip(projected.iter()) {
            assert!((future.q - 0.512 * original.q).abs() < 1e-9);
            assert!((future.p - original.p).abs() < f64::EPSILON);
        }
    }
}
