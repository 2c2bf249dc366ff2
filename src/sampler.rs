//! IPR curve sampler
//!
//! Discretizes a resolved correlation into an ordered `(p, q)` curve for
//! the external plotting collaborator. Sampled pressures run from standard
//! pressure up to the governing reservoir pressure in integer-floored
//! steps of `p_res / n_intervals`, merged with the pressures of any
//! recorded test points, sorted ascending and deduplicated.
//!
//! The governing pressure is a parameter (not always the well's present
//! `p_res`) so future curves can be sampled at the declined pressure.

use crate::error::IprError;
use crate::types::{
    CurvePoint, Method, Phase, ProductionCurve, ThreePhaseWell, Well, STANDARD_PRESSURE,
};

/// Round a sampled rate to 2 decimal places for plotting.
fn round_rate(q: f64) -> f64 {
    (q * 100.0).round() / 100.0
}

/// Build the ascending pressure axis: fixed-step segments from standard
/// pressure plus the supplied test-point pressures and `p_res` itself.
fn sample_pressures(
    p_res: f64,
    n_intervals: i32,
    test_pressures: impl Iterator<Item = f64>,
) -> Vec<f64> {
    let mut pressures: Vec<f64> = test_pressures.collect();
    pressures.push(p_res);

    // Integer-floored step; a step below 1 psia would never advance.
    let interval = (p_res / f64::from(n_intervals)).floor();
    if interval >= 1.0 {
        let mut segment = STANDARD_PRESSURE;
        while segment < p_res {
            pressures.push(segment);
            segment += interval;
        }
    }

    pressures.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    pressures.dedup();
    pressures
}

impl Well {
    /// Sample an IPR curve for `method` at the governing pressure `p_res`.
    ///
    /// For Fetkovich the regression is refitted from the live dataset at
    /// sampling time. `n_intervals <= 0` yields an empty curve (explicit
    /// no-op, not an error).
    pub fn production_curve(
        &self,
        method: Method,
        q_max: f64,
        n_intervals: i32,
        p_res: f64,
    ) -> Result<ProductionCurve, IprError> {
        if n_intervals <= 0 {
            return Ok(ProductionCurve::default());
        }
        if !p_res.is_finite() || p_res <= 0.0 {
            return Err(IprError::domain(
                "curve sampler",
                format!("governing pressure must be positive, got {p_res}"),
            ));
        }

        let correlation = self.correlation(method)?;
        let points = sample_pressures(p_res, n_intervals, self.dataset.iter().map(|pt| pt.p))
            .into_iter()
            .map(|p| CurvePoint {
                p,
                q: round_rate(q_max * correlation.flow_ratio(p, p_res)),
            })
            .collect();

        Ok(ProductionCurve::from_points(points))
    }
}

impl ThreePhaseWell {
    /// Sample a phase-resolved Wiggin IPR curve at the governing pressure.
    pub fn production_curve(
        &self,
        method: Method,
        phase: Phase,
        q_max: f64,
        n_intervals: i32,
        p_res: f64,
    ) -> Result<ProductionCurve, IprError> {
        if n_intervals <= 0 {
            return Ok(ProductionCurve::default());
        }
        if method != Method::Wiggin {
            return Err(IprError::UnknownMethod(method.to_string()));
        }
        if !p_res.is_finite() || p_res <= 0.0 {
            return Err(IprError::domain(
                "curve sampler",
                format!("governing pressure must be positive, got {p_res}"),
            ));
        }

        let points = sample_pressures(p_res, n_intervals, self.dataset.iter().map(|pt| pt.p))
            .into_iter()
            .map(|p| CurvePoint {
                p,
                q: round_rate(q_max * crate::equations::wiggin_flow_ratio(phase, p, p_res)),
            })
            .collect();

        Ok(ProductionCurve::from_points(points))
    }
}
