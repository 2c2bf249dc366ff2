//! Shared data structures for well deliverability analysis
//!
//! This module defines the core value types flowing through the engine:
//! - TestPoint / ProductionDataset (production-test observations)
//! - ReservoirState (present and projected reservoir pressure)
//! - Well / ThreePhaseWell (owning aggregates handed to the calculators)
//! - Method / ProjectionMethod / Phase (validated correlation tags)
//! - CurvePoint / ProductionCurve (sampled IPR output for plotting)
//!
//! Units are fixed throughout: pressure in psia, flow rate in stock-tank
//! barrels per day (stbd), temperature in degrees Fahrenheit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IprError;

// ============================================================================
// Standard Conditions
// ============================================================================

/// Standard (atmospheric) pressure, psia. Lower bound of every sampled curve.
pub const STANDARD_PRESSURE: f64 = 14.7;

/// Standard temperature, °F. Documents the stock-tank rate convention.
pub const STANDARD_TEMPERATURE: f64 = 60.0;

// ============================================================================
// Production Test Data
// ============================================================================

/// A single production-test observation.
///
/// Immutable once recorded. Invariants expected by the correlations:
/// `q >= 0` and `0 <= p <= p_res` of the owning well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestPoint {
    /// Total liquid flow rate (stbd)
    pub q: f64,
    /// Flowing wellbore pressure (psia)
    pub p: f64,
}

impl TestPoint {
    #[must_use]
    pub const fn new(q: f64, p: f64) -> Self {
        Self { q, p }
    }
}

impl fmt::Display for TestPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ q: {} stbd, p: {} psia }}", self.q, self.p)
    }
}

/// Append-only collection of production-test points.
///
/// Points are never removed or reordered once inserted; the regression
/// engine re-reads the full dataset on every call that needs it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductionDataset {
    points: Vec<TestPoint>,
}

impl ProductionDataset {
    #[must_use]
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Append test points. Insertion is the only mutation this type allows.
    pub fn insert(&mut self, points: impl IntoIterator<Item = TestPoint>) {
        self.points.extend(points);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestPoint> {
        self.points.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[TestPoint] {
        &self.points
    }
}

impl<'a> IntoIterator for &'a ProductionDataset {
    type Item = &'a TestPoint;
    type IntoIter = std::slice::Iter<'a, TestPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl FromIterator<TestPoint> for ProductionDataset {
    fn from_iter<T: IntoIterator<Item = TestPoint>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Reservoir State
// ============================================================================

/// Present and projected reservoir pressure for one well.
///
/// The future pressure is derived, never set directly:
/// `future_p_res = p_res * (1 - production_change)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReservoirState {
    /// Current static reservoir pressure (psia), > 0
    pub p_res: f64,
    production_change: Option<f64>,
    future_p_res: Option<f64>,
}

impl ReservoirState {
    #[must_use]
    pub const fn new(p_res: f64) -> Self {
        Self {
            p_res,
            production_change: None,
            future_p_res: None,
        }
    }

    /// Record the fractional pressure decline and derive the future
    /// reservoir pressure from it.
    pub fn set_production_change(&mut self, production_change: f64) {
        self.production_change = Some(production_change);
        self.future_p_res = Some(self.p_res * (1.0 - production_change));
    }

    #[must_use]
    pub const fn production_change(&self) -> Option<f64> {
        self.production_change
    }

    /// Projected future reservoir pressure, or `FutureStateNotSet` if the
    /// production change has not been established yet.
    pub fn future_p_res(&self) -> Result<f64, IprError> {
        self.future_p_res.ok_or(IprError::FutureStateNotSet)
    }
}

// ============================================================================
// Correlation Tags
// ============================================================================

/// Fluid phase for phase-aware correlations (Wiggin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Oil,
    Water,
}

impl FromStr for Phase {
    type Err = IprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oil" => Ok(Self::Oil),
            "water" => Ok(Self::Water),
            other => Err(IprError::UnknownPhase(other.to_string())),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oil => write!(f, "oil"),
            Self::Water => write!(f, "water"),
        }
    }
}

/// Deliverability correlation selector.
///
/// Parsed from external string tags via `FromStr`; inside the engine all
/// dispatch is on this enum, never on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Vogel,
    Fetkovich,
    Wiggin,
}

impl FromStr for Method {
    type Err = IprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vogel" => Ok(Self::Vogel),
            "fetkovich" => Ok(Self::Fetkovich),
            "wiggin" => Ok(Self::Wiggin),
            other => Err(IprError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vogel => write!(f, "vogel"),
            Self::Fetkovich => write!(f, "fetkovich"),
            Self::Wiggin => write!(f, "wiggin"),
        }
    }
}

/// Future-performance projection family.
///
/// Standing and Eckmeir are Vogel-family analogs; Fetkovich projects with
/// the fitted deliverability exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMethod {
    Standing,
    Eckmeir,
    Fetkovich,
}

impl FromStr for ProjectionMethod {
    type Err = IprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standing" => Ok(Self::Standing),
            "eckmeir" => Ok(Self::Eckmeir),
            "fetkovich" => Ok(Self::Fetkovich),
            other => Err(IprError::UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for ProjectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standing => write!(f, "standing"),
            Self::Eckmeir => write!(f, "eckmeir"),
            Self::Fetkovich => write!(f, "fetkovich"),
        }
    }
}

// ============================================================================
// Wells
// ============================================================================

/// Two-phase (oil) well: one reservoir state plus its production tests.
///
/// `water_cut` / `future_water_cut` are optional and only consulted by
/// phase-aware consumers; the Vogel/Fetkovich paths ignore them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Well {
    pub reservoir: ReservoirState,
    pub dataset: ProductionDataset,
    pub water_cut: Option<f64>,
    pub future_water_cut: Option<f64>,
}

impl Well {
    #[must_use]
    pub const fn new(p_res: f64) -> Self {
        Self {
            reservoir: ReservoirState::new(p_res),
            dataset: ProductionDataset::new(),
            water_cut: None,
            future_water_cut: None,
        }
    }

    /// Current reservoir pressure (psia).
    #[must_use]
    pub const fn p_res(&self) -> f64 {
        self.reservoir.p_res
    }

    /// Append production-test points to the owned dataset.
    pub fn insert(&mut self, points: impl IntoIterator<Item = TestPoint>) {
        self.dataset.insert(points);
    }

    /// Record the fractional reservoir-pressure decline, deriving
    /// `future_p_res = p_res * (1 - production_change)`.
    pub fn set_production_change(&mut self, production_change: f64) {
        self.reservoir.set_production_change(production_change);
    }
}

impl fmt::Display for Well {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Production performance data with reservoir pressure (psia) = {}",
            self.reservoir.p_res
        )?;
        if self.dataset.is_empty() {
            write!(f, "and empty production data.")
        } else {
            writeln!(f, "and some production data: [")?;
            for point in &self.dataset {
                writeln!(f, "    {point},")?;
            }
            write!(f, "].")
        }
    }
}

/// Three-phase well: splits the total liquid rate into oil and water
/// components through a mandatory water cut.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreePhaseWell {
    pub reservoir: ReservoirState,
    pub dataset: ProductionDataset,
    /// Water fraction of total liquid rate, in (0, 1) when the water phase
    /// is queried.
    pub water_cut: f64,
}

impl ThreePhaseWell {
    #[must_use]
    pub const fn new(p_res: f64, water_cut: f64) -> Self {
        Self {
            reservoir: ReservoirState::new(p_res),
            dataset: ProductionDataset::new(),
            water_cut,
        }
    }

    /// Current reservoir pressure (psia).
    #[must_use]
    pub const fn p_res(&self) -> f64 {
        self.reservoir.p_res
    }

    /// Append production-test points to the owned dataset.
    pub fn insert(&mut self, points: impl IntoIterator<Item = TestPoint>) {
        self.dataset.insert(points);
    }
}

impl fmt::Display for ThreePhaseWell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Three-phase production performance data with reservoir pressure (psia) = {} and water cut = {}",
            self.reservoir.p_res, self.water_cut
        )?;
        if self.dataset.is_empty() {
            write!(f, "and empty production data.")
        } else {
            writeln!(f, "and some production data: [")?;
            for point in &self.dataset {
                writeln!(f, "    {point},")?;
            }
            write!(f, "].")
        }
    }
}

// ============================================================================
// Sampled IPR Curve
// ============================================================================

/// One sampled point of an inflow performance relationship curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Flowing wellbore pressure (psia)
    pub p: f64,
    /// Flow rate at that pressure (stbd), rounded to 2 decimals
    pub q: f64,
}

/// Ordered, write-once IPR curve produced by the sampler and consumed by
/// the external plotting collaborator. Points ascend by pressure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductionCurve {
    points: Vec<CurvePoint>,
}

impl ProductionCurve {
    #[must_use]
    pub(crate) fn from_points(points: Vec<CurvePoint>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CurvePoint> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a ProductionCurve {
    type Item = &'a CurvePoint;
    type IntoIter = std::slice::Iter<'a, CurvePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
