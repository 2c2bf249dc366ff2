//! Error taxonomy for the deliverability engine
//!
//! Every fallible public operation returns a typed `Result` carrying one of
//! these kinds. Failures are reported to the caller (CLI/plotting layer),
//! never retried or defaulted inside the engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IprError {
    /// Method tag is not one of the supported correlation set.
    #[error("Unknown deliverability method: '{0}'")]
    UnknownMethod(String),

    /// Phase tag is not one of {oil, water}.
    #[error("Unknown fluid phase: '{0}' (available phases: oil, water)")]
    UnknownPhase(String),

    /// Power-law regression attempted with fewer than 2 usable samples.
    #[error("Insufficient production data for regression: have {0} usable test points, need {1}")]
    InsufficientData(usize, usize),

    /// An equation produced an out-of-domain intermediate, e.g. a negative
    /// radicand in an inverse computation or a non-positive pressure.
    #[error("Out-of-domain value in {0}: {1}")]
    Domain(&'static str, String),

    /// Future projection requested before the future reservoir state
    /// (production change / future reservoir pressure) was established.
    #[error("Future reservoir state not set; call set_production_change() before projecting")]
    FutureStateNotSet,
}

impl IprError {
    /// Shorthand for domain violations carrying the offending value.
    pub fn domain(context: &'static str, detail: impl Into<String>) -> Self {
        Self::Domain(context, detail.into())
    }
}
