//! Composite risk estimation for custom flooding and cyclone scenarios.
//!
//! A [`ScenarioInput`] holds named factors, each optional. [`estimate`]
//! combines the factors relevant to a [`Domain`] into a weighted sum and
//! clamps the result into the 0–10 risk scale. Absent factors contribute
//! nothing, so a half-filled scenario still produces a score.

pub mod calculator;
pub mod domain;
pub mod formula;
pub mod input;
pub mod normalize;
pub mod uncertainty;

pub use calculator::{assess_cyclone, assess_flooding, Assessment, CycloneConditions, FloodingConditions};
pub use domain::{Domain, DomainParseError};
pub use formula::{estimate, explain, Breakdown, TermContribution};
pub use input::{Factor, ScenarioInput, UnknownFactor};
pub use uncertainty::{estimate_with_uncertainty, Uncertainty};
