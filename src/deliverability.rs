//! Deliverability calculator
//!
//! Resolves a method tag into a [`Correlation`] (fitting the Fetkovich
//! exponent from the live dataset when required) and computes the maximum
//! flow rate `q_max = q / flow_ratio` for a single production test, plus
//! the inverse problem of recovering the flowing wellbore pressure from a
//! rate/q_max pair.

use tracing::debug;

use crate::equations::{
    fetkovich_flow_ratio, fetkovich_pressure_ratio, vogel_flow_ratio, vogel_pressure_ratio,
    wiggin_flow_ratio, wiggin_pressure_ratio,
};
use crate::error::IprError;
use crate::regression::{fit_fetkovich, PowerFit};
use crate::types::{Method, Phase, TestPoint, ThreePhaseWell, Well};

// ============================================================================
// Resolved Correlation
// ============================================================================

/// A correlation resolved for one computation: method tag plus any fitted
/// or phase-specific parameters. All downstream dispatch happens on this
/// tagged union.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    Vogel,
    Fetkovich { fit: PowerFit },
    Wiggin { phase: Phase },
}

impl Correlation {
    /// Dimensionless flow ratio `q / q_max` at flowing pressure `p`.
    #[must_use]
    pub fn flow_ratio(&self, p: f64, p_res: f64) -> f64 {
        match self {
            Self::Vogel => vogel_flow_ratio(p, p_res),
            Self::Fetkovich { fit } => fetkovich_flow_ratio(p, p_res, fit.n),
            Self::Wiggin { phase } => wiggin_flow_ratio(*phase, p, p_res),
        }
    }

    /// Pressure ratio `p / p_res` recovered from a rate/q_max pair.
    pub fn inverse_flow_ratio(&self, q: f64, q_max: f64) -> Result<f64, IprError> {
        match self {
            Self::Vogel => vogel_pressure_ratio(q, q_max),
            Self::Fetkovich { fit } => fetkovich_pressure_ratio(q, q_max, fit.n),
            Self::Wiggin { phase } => wiggin_pressure_ratio(*phase, q, q_max),
        }
    }
}

// ============================================================================
// Input Validation
// ============================================================================

/// Entry validation shared by the public calculator operations.
pub(crate) fn check_inputs(p_res: f64, point: &TestPoint) -> Result<(), IprError> {
    if !p_res.is_finite() || p_res <= 0.0 {
        return Err(IprError::domain(
            "deliverability",
            format!("reservoir pressure must be positive, got {p_res}"),
        ));
    }
    if !point.q.is_finite() || point.q < 0.0 {
        return Err(IprError::domain(
            "deliverability",
            format!("flow rate must be non-negative, got {}", point.q),
        ));
    }
    if !point.p.is_finite() || point.p < 0.0 {
        return Err(IprError::domain(
            "deliverability",
            format!("flowing pressure must be non-negative, got {}", point.p),
        ));
    }
    Ok(())
}

// ============================================================================
// Two-Phase (Oil) Wells
// ============================================================================

impl Well {
    /// Resolve a method tag against this well, running the power-law fit
    /// for Fetkovich. The fit is recomputed on every call; the dataset may
    /// have grown since the last one.
    pub(crate) fn correlation(&self, method: Method) -> Result<Correlation, IprError> {
        match method {
            Method::Vogel => Ok(Correlation::Vogel),
            Method::Fetkovich => Ok(Correlation::Fetkovich {
                fit: fit_fetkovich(&self.dataset, self.p_res())?,
            }),
            // Wiggin needs a phase split; only three-phase wells carry one.
            Method::Wiggin => Err(IprError::UnknownMethod(method.to_string())),
        }
    }

    /// Maximum flow rate (AOF) for a single test point under `method`.
    ///
    /// Guaranteed finite and positive for flowing pressures strictly below
    /// reservoir pressure; a vanishing flow ratio (p at or above p_res) is
    /// a `Domain` error rather than an infinite rate.
    pub fn q_max(&self, method: Method, point: &TestPoint) -> Result<f64, IprError> {
        check_inputs(self.p_res(), point)?;

        let correlation = self.correlation(method)?;
        let flow_ratio = correlation.flow_ratio(point.p, self.p_res());
        if flow_ratio <= 0.0 {
            return Err(IprError::domain(
                "deliverability",
                format!(
                    "flow ratio vanishes at p = {} (at or above reservoir pressure)",
                    point.p
                ),
            ));
        }
        let q_max = point.q / flow_ratio;

        debug!(%method, q = point.q, p = point.p, q_max, "resolved deliverability");
        Ok(q_max)
    }

    /// Vogel q_max against an arbitrary governing reservoir pressure.
    ///
    /// Used by the Standing projection path, which re-applies Vogel at the
    /// declined future pressure.
    pub fn q_max_at(&self, p_res: f64, point: &TestPoint) -> Result<f64, IprError> {
        check_inputs(p_res, point)?;
        Ok(point.q / vogel_flow_ratio(point.p, p_res))
    }

    /// Flowing wellbore pressure from a rate and its q_max:
    /// `p_wf = pressure_ratio * p_res`.
    pub fn pwf(&self, method: Method, q: f64, q_max: f64) -> Result<f64, IprError> {
        let correlation = self.correlation(method)?;
        let pressure_ratio = correlation.inverse_flow_ratio(q, q_max)?;
        Ok(pressure_ratio * self.p_res())
    }
}

// ============================================================================
// Three-Phase Wells
// ============================================================================

impl ThreePhaseWell {
    /// Phase rate after the water-cut split of the total liquid rate.
    fn phase_rate(&self, phase: Phase, q: f64) -> Result<f64, IprError> {
        match phase {
            Phase::Oil => Ok(q),
            Phase::Water => {
                if self.water_cut <= 0.0 || self.water_cut >= 1.0 {
                    return Err(IprError::domain(
                        "water-cut split",
                        format!("water cut must lie in (0, 1), got {}", self.water_cut),
                    ));
                }
                Ok(q / (1.0 / self.water_cut - 1.0))
            }
        }
    }

    /// Maximum flow rate for the selected phase under `method`.
    ///
    /// Only the phase-aware Wiggin correlation is recognized for
    /// three-phase wells.
    pub fn q_max(&self, method: Method, phase: Phase, point: &TestPoint) -> Result<f64, IprError> {
        check_inputs(self.p_res(), point)?;

        if method != Method::Wiggin {
            return Err(IprError::UnknownMethod(method.to_string()));
        }

        let flow_ratio = wiggin_flow_ratio(phase, point.p, self.p_res());
        if flow_ratio <= 0.0 {
            return Err(IprError::domain(
                "deliverability",
                format!(
                    "flow ratio vanishes at p = {} (at or above reservoir pressure)",
                    point.p
                ),
            ));
        }
        let q = self.phase_rate(phase, point.q)?;
        let q_max = q / flow_ratio;

        debug!(%method, %phase, q, p = point.p, q_max, "resolved deliverability");
        Ok(q_max)
    }

    /// Flowing wellbore pressure for the selected phase from a rate and
    /// its q_max.
    pub fn pwf(&self, phase: Phase, q: f64, q_max: f64) -> Result<f64, IprError> {
        let pressure_ratio = wiggin_pressure_ratio(phase, q, q_max)?;
        Ok(pressure_ratio * self.p_res())
    }
}
