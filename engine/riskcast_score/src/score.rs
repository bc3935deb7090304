use std::fmt;

use crate::category::{classify, Classification, RiskCategory};

/// Lowest score on the risk scale.
pub const MIN_SCORE: f64 = 0.0;
/// Highest score on the risk scale.
pub const MAX_SCORE: f64 = 10.0;

/// A risk score clamped into `[0, 10]`.
///
/// NaN collapses to `0.0`, infinities clamp to the nearest bound.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RiskScore(f64);

impl RiskScore {
    /// The lowest possible score.
    pub const ZERO: RiskScore = RiskScore(MIN_SCORE);
    /// The highest possible score.
    pub const MAX: RiskScore = RiskScore(MAX_SCORE);

    /// Clamp `raw` into the risk scale.
    pub fn new(raw: f64) -> Self {
        if raw.is_nan() {
            return Self::ZERO;
        }
        RiskScore(raw.clamp(MIN_SCORE, MAX_SCORE))
    }

    /// The underlying value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Category bucket for this score.
    pub fn category(self) -> RiskCategory {
        RiskCategory::from_score(self.0)
    }

    /// Category plus display colour.
    pub fn classify(self) -> Classification {
        classify(self.0)
    }
}

impl From<f64> for RiskScore {
    fn from(raw: f64) -> Self {
        RiskScore::new(raw)
    }
}

impl From<RiskScore> for f64 {
    fn from(score: RiskScore) -> Self {
        score.0
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_score(self.0))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for RiskScore {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Ok(RiskScore::new(raw))
    }
}

/// Render a score with exactly two decimals.
///
/// Non-finite input renders as `"0.00"`.
pub fn format_score(score: f64) -> String {
    if !score.is_finite() {
        return "0.00".to_string();
    }
    let rounded = round2(score);
    if !rounded.is_finite() {
        return format!("{score:.2}");
    }
    // avoid "-0.00" for tiny negatives
    if rounded == 0.0 {
        return "0.00".to_string();
    }
    format!("{rounded:.2}")
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * 100.0).round() / 100.0
}
