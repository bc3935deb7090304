use std::fmt;
use std::str::FromStr;

use crate::score::{MAX_SCORE, MIN_SCORE};

/// Highest score still classified as [`RiskCategory::Low`].
pub const LOW_CEILING: f64 = 3.5;
/// Highest score still classified as [`RiskCategory::Medium`].
pub const MEDIUM_CEILING: f64 = 7.4;

/// Discrete risk bucket derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RiskCategory {
    /// `score <= 3.5`
    #[default]
    Low,
    /// `3.5 < score <= 7.4`
    Medium,
    /// `score > 7.4`
    High,
}

impl RiskCategory {
    /// Bucket a raw score. Non-finite scores fail soft: NaN and `-inf`
    /// are Low, `+inf` is High.
    pub fn from_score(score: f64) -> Self {
        if score.is_nan() {
            return RiskCategory::Low;
        }
        match score.clamp(MIN_SCORE, MAX_SCORE) {
            s if s <= LOW_CEILING => RiskCategory::Low,
            s if s <= MEDIUM_CEILING => RiskCategory::Medium,
            _ => RiskCategory::High,
        }
    }

    /// Display colour paired with this category.
    pub fn color(self) -> RiskColor {
        match self {
            RiskCategory::Low => RiskColor::Green,
            RiskCategory::Medium => RiskColor::Amber,
            RiskCategory::High => RiskColor::Red,
        }
    }

    /// Label as stored by the prediction backend.
    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored category label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown risk category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for RiskCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskCategory::Low),
            "medium" | "moderate" => Ok(RiskCategory::Medium),
            "high" => Ok(RiskCategory::High),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// Presentation colour for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RiskColor {
    /// Low risk.
    Green,
    /// Medium risk.
    Amber,
    /// High risk.
    Red,
}

impl RiskColor {
    /// Stable token consumed by the dashboard's styling layer.
    pub fn token(self) -> &'static str {
        match self {
            RiskColor::Green => "low/green",
            RiskColor::Amber => "medium/amber",
            RiskColor::Red => "high/red",
        }
    }

    /// Hex colour used by map markers and badges.
    pub fn hex(self) -> &'static str {
        match self {
            RiskColor::Green => "#22c55e",
            RiskColor::Amber => "#f59e0b",
            RiskColor::Red => "#ef4444",
        }
    }
}

impl fmt::Display for RiskColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Category and colour for one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Classification {
    /// Risk bucket.
    pub category: RiskCategory,
    /// Display colour for the bucket.
    pub color: RiskColor,
}

impl From<RiskCategory> for Classification {
    fn from(category: RiskCategory) -> Self {
        Self {
            category,
            color: category.color(),
        }
    }
}

/// Classify a score into a category and display colour.
///
/// Never panics; non-finite input degrades as described on
/// [`RiskCategory::from_score`].
pub fn classify(score: f64) -> Classification {
    let category = RiskCategory::from_score(score);
    if !score.is_finite() {
        log::debug!("classify: non-finite score {score} treated as {category}");
    }
    Classification::from(category)
}
