//! Empirical IPR correlations and their closed-form inverses
//!
//! Stateless scalar functions shared by the deliverability calculator,
//! the projection module and the curve sampler:
//! - Vogel (two-phase oil)
//! - Fetkovich (backpressure form, fitted exponent n)
//! - Wiggin (three-phase, per fluid phase)
//!
//! Each forward function maps a pressure ratio `pr = p / p_res` to a
//! dimensionless flow ratio `qr = q / q_max` in (0, 1]. Each inverse
//! recovers the pressure ratio from a flow ratio, detecting out-of-domain
//! radicands before taking a root.

use crate::error::IprError;
use crate::types::Phase;

/// Floor applied when floating error drives the Vogel ratio non-positive
/// (p marginally above p_res). Keeps downstream division well-defined.
pub const VOGEL_EPSILON: f64 = 1e-8;

// ============================================================================
// Forward Correlations (pressure -> flow ratio)
// ============================================================================

/// Vogel flow-rate ratio.
///
/// Formula: qr = 1 - 0.2·(p/p_res) - 0.8·(p/p_res)²
///
/// A non-positive algebraic result is clamped to [`VOGEL_EPSILON`].
#[must_use]
pub fn vogel_flow_ratio(p: f64, p_res: f64) -> f64 {
    let pr = p / p_res;
    let qr = 1.0 - (0.2 * pr) - (0.8 * pr * pr);

    if qr > 0.0 {
        qr
    } else {
        VOGEL_EPSILON
    }
}

/// Fetkovich flow-rate ratio (Rawlins-Schellhardt backpressure form).
///
/// Formula: qr = (1 - (p/p_res)²)^n
///
/// Floating drift can carry `p` a ULP above `p_res`; the base is clamped
/// at 0 before exponentiation, otherwise `powf` would return NaN. `n`
/// comes from the power-law regression on the well's tests.
#[must_use]
pub fn fetkovich_flow_ratio(p: f64, p_res: f64, n: f64) -> f64 {
    let pr_squared = (p / p_res).powi(2);
    (1.0 - pr_squared).max(0.0).powf(n)
}

/// Wiggin flow-rate ratio for the selected phase.
///
/// Formula (oil):   qr = 1 - 0.52·(p/p_res) - 0.48·(p/p_res)²
/// Formula (water): qr = 1 - 0.72·(p/p_res) - 0.28·(p/p_res)²
///
/// Clamped at 0 for the same `p` marginally above `p_res` drift as
/// Fetkovich.
#[must_use]
pub fn wiggin_flow_ratio(phase: Phase, p: f64, p_res: f64) -> f64 {
    let pr = p / p_res;

    let qr = match phase {
        Phase::Oil => 1.0 - (0.52 * pr) - (0.48 * pr * pr),
        Phase::Water => 1.0 - (0.72 * pr) - (0.28 * pr * pr),
    };
    qr.max(0.0)
}

// ============================================================================
// Inverse Correlations (flow ratio -> pressure ratio)
// ============================================================================

/// Pressure ratio from the rearranged Vogel equation.
///
/// Solves -0.8·pr² - 0.2·pr + (1 - qr) = 0 for the root in [0, 1].
pub fn vogel_pressure_ratio(q: f64, q_max: f64) -> Result<f64, IprError> {
    let qr = flow_ratio_input("vogel inverse", q, q_max)?;
    quadratic_pressure_ratio("vogel inverse", -0.8, -0.2, 1.0 - qr)
}

/// Pressure ratio from the rearranged Fetkovich equation.
///
/// Formula: pr = sqrt(1 - qr^(1/n))
pub fn fetkovich_pressure_ratio(q: f64, q_max: f64, n: f64) -> Result<f64, IprError> {
    if n <= 0.0 {
        return Err(IprError::domain(
            "fetkovich inverse",
            format!("non-positive deliverability exponent n = {n}"),
        ));
    }

    let qr = flow_ratio_input("fetkovich inverse", q, q_max)?;
    let radicand = 1.0 - qr.powf(1.0 / n);
    if radicand < 0.0 {
        return Err(IprError::domain(
            "fetkovich inverse",
            format!("negative radicand {radicand} for flow ratio {qr}"),
        ));
    }

    Ok(radicand.sqrt())
}

/// Pressure ratio from the rearranged Wiggin equation for the given phase.
pub fn wiggin_pressure_ratio(phase: Phase, q: f64, q_max: f64) -> Result<f64, IprError> {
    let qr = flow_ratio_input("wiggin inverse", q, q_max)?;

    let (a, b) = match phase {
        Phase::Oil => (-0.48, -0.52),
        Phase::Water => (-0.28, -0.72),
    };

    quadratic_pressure_ratio("wiggin inverse", a, b, 1.0 - qr)
}

// ============================================================================
// Shared Numerics
// ============================================================================

/// Validate `(q, q_max)` and form the flow ratio for an inverse computation.
fn flow_ratio_input(context: &'static str, q: f64, q_max: f64) -> Result<f64, IprError> {
    if q_max <= 0.0 {
        return Err(IprError::domain(
            context,
            format!("non-positive q_max = {q_max}"),
        ));
    }
    if q < 0.0 {
        return Err(IprError::domain(context, format!("negative flow rate q = {q}")));
    }

    Ok(q / q_max)
}

/// Solve `a·pr² + b·pr + c = 0` and select the root lying in [0, 1].
///
/// Both roots are formed explicitly; the fixed `-b - sqrt(disc)` sign choice
/// picks the wrong branch for these coefficient sets, so the in-domain root
/// is identified by inspection instead.
fn quadratic_pressure_ratio(
    context: &'static str,
    a: f64,
    b: f64,
    c: f64,
) -> Result<f64, IprError> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Err(IprError::domain(
            context,
            format!("negative discriminant {discriminant}"),
        ));
    }

    let sqrt_disc = discriminant.sqrt();
    let roots = [(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)];

    const ROOT_TOLERANCE: f64 = 1e-9;
    roots
        .iter()
        .find(|root| (-ROOT_TOLERANCE..=1.0 + ROOT_TOLERANCE).contains(*root))
        .map(|root| root.clamp(0.0, 1.0))
        .ok_or_else(|| {
            IprError::domain(
                context,
                format!("no pressure-ratio root in [0, 1]; candidates {roots:?}"),
            )
        })
}
