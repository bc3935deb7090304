//! Risk score classification for weather hazard predictions.
//!
//! Scores live on a 0–10 scale. This crate maps a score to one of three
//! categories and a display colour, and renders scores with two decimals.
//! Every entry point is total: non-numeric input renders as `0.00` and
//! classifies as [`RiskCategory::Low`] instead of failing.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod category;
pub mod coerce;
pub mod intensity;
pub mod score;

pub use category::{classify, Classification, RiskCategory, RiskColor, UnknownCategory};
pub use coerce::{classify_value, coerce_score, format_value};
pub use intensity::RainfallIntensity;
pub use score::{format_score, round2, RiskScore, MAX_SCORE, MIN_SCORE};
