use std::fmt;

use riskcast_score::{RiskCategory, RiskColor, RiskScore};
use serde::Serialize;

use crate::record::{CyclonePrediction, FloodingPrediction};

/// A stored prediction carrying a risk score and the category the backend
/// saved alongside it.
pub trait ScoredRecord {
    /// Human label for the row (place or storm name).
    fn label(&self) -> String;
    fn date(&self) -> &str;
    fn stored_score(&self) -> Option<f64>;
    fn stored_category(&self) -> Option<&str>;
    /// Extra per-kind detail shown after the score.
    fn detail(&self) -> String {
        String::new()
    }
}

impl ScoredRecord for FloodingPrediction {
    fn label(&self) -> String {
        match &self.location_details {
            Some(loc) => loc.label(),
            None => self.location.clone(),
        }
    }

    fn date(&self) -> &str {
        &self.prediction_date
    }

    fn stored_score(&self) -> Option<f64> {
        self.risk_score
    }

    fn stored_category(&self) -> Option<&str> {
        self.risk_category.as_deref()
    }

    fn detail(&self) -> String {
        format!(
            "flood {:.0}% mudslide {:.0}% pop {}",
            self.flood_probability * 100.0,
            self.mudslide_probability * 100.0,
            self.affected_population
        )
    }
}

impl ScoredRecord for CyclonePrediction {
    fn label(&self) -> String {
        if self.cyclone_name.is_empty() {
            format!("cyclone {}", self.id)
        } else {
            self.cyclone_name.clone()
        }
    }

    fn date(&self) -> &str {
        &self.prediction_date
    }

    fn stored_score(&self) -> Option<f64> {
        self.risk_score
    }

    fn stored_category(&self) -> Option<&str> {
        self.risk_category.as_deref()
    }

    fn detail(&self) -> String {
        format!(
            "cat {} {:.0} km/h {} track pts",
            self.category,
            self.max_wind_speed_kmh,
            self.path_coordinates.len()
        )
    }
}

/// What a dashboard shows for one record. Category and colour are always
/// re-derived from the score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub label: String,
    pub date: String,
    pub score: String,
    pub category: RiskCategory,
    pub color: RiskColor,
    pub detail: String,
}

impl DisplayRow {
    pub fn from_record<R: ScoredRecord + ?Sized>(record: &R) -> Self {
        let score = RiskScore::new(record.stored_score().unwrap_or(0.0));
        let c = score.classify();

        if let Some(stored) = record.stored_category() {
            match stored.parse::<RiskCategory>() {
                Ok(cat) if cat == c.category => {}
                Ok(cat) => log::debug!(
                    "{}: stored category {cat} disagrees with score {}; showing {}",
                    record.label(),
                    score,
                    c.category
                ),
                Err(e) => log::debug!("{}: {e}; showing {}", record.label(), c.category),
            }
        }

        DisplayRow {
            label: record.label(),
            date: record.date().to_string(),
            score: score.to_string(),
            category: c.category,
            color: c.color,
            detail: record.detail(),
        }
    }
}

impl fmt::Display for DisplayRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<10}  {:<24}  {:>5}  {:<6} ({})",
            self.date,
            self.label,
            self.score,
            self.category.as_str(),
            self.color.token()
        )?;
        if !self.detail.is_empty() {
            write!(f, "  {}", self.detail)?;
        }
        Ok(())
    }
}
