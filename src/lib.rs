//! IPR Engine: Well Deliverability Analysis
//!
//! Estimates well deliverability from production-test data using empirical
//! inflow-performance correlations and projects how deliverability declines
//! as reservoir pressure falls.
//!
//! ## Architecture
//!
//! - **Equation Library**: Vogel, Fetkovich and Wiggin correlations with
//!   closed-form inverses
//! - **Regression Engine**: log-linear power-law fit for the Fetkovich
//!   deliverability exponent
//! - **Deliverability Calculator**: q_max / AOF per test point and method
//! - **Projection Module**: present/future productivity index and rates
//!   (Standing, Eckmeir, Fetkovich analogs)
//! - **Curve Sampler**: discretized IPR curves for external plotting
//!
//! Units are fixed: pressure in psia, rate in stbd, temperature in °F.
//! The crate is synchronous and single-threaded; hosts embedding it in a
//! concurrent setting must serialize dataset insertions per well.

pub mod deliverability;
pub mod equations;
pub mod error;
pub mod projection;
pub mod regression;
pub mod sampler;
pub mod types;

// Re-export the error type
pub use error::IprError;

// Re-export commonly used types
pub use types::{
    CurvePoint, Method, Phase, ProductionCurve, ProductionDataset, ProjectionMethod,
    ReservoirState, TestPoint, ThreePhaseWell, Well, STANDARD_PRESSURE, STANDARD_TEMPERATURE,
};

// Re-export the calculator and regression surfaces
pub use deliverability::Correlation;
pub use regression::{fit_fetkovich, fit_power_law, PowerFit, MIN_REGRESSION_SAMPLES};
