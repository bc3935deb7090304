//! Risk assessment from raw site and storm measurements.
//!
//! The calculator normalizes raw readings, derives the flood and mudslide
//! probabilities, and runs the same formulas as [`crate::estimate`]. It is
//! the deterministic path the prediction wrappers fall back to.

use serde::{Deserialize, Serialize};

use riskcast_score::{round2, Classification, RiskCategory, RiskColor, RiskScore};

use crate::domain::Domain;
use crate::formula::estimate;
use crate::input::ScenarioInput;
use crate::normalize;

/// Raw conditions for a flooding assessment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloodingConditions {
    pub predicted_rainfall_mm: f64,
    pub infrastructure_strength: f64,
    pub soil_moisture_retention: f64,
    pub vegetation_density: f64,
    pub population_density: f64,
}

/// Raw conditions for a cyclone assessment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycloneConditions {
    pub wind_speed_kmh: f64,
    pub category: u8,
    pub distance_km: f64,
    pub infrastructure_strength: f64,
    pub population_size: f64,
}

/// Outcome of an assessment.
///
/// Probabilities are rounded to two decimals; `flood_probability` and
/// `mudslide_probability` are only set for flooding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub domain: Domain,
    pub risk_score: RiskScore,
    pub risk_category: RiskCategory,
    pub risk_color: RiskColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flood_probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mudslide_probability: Option<f64>,
}

impl Assessment {
    fn new(domain: Domain, risk_score: RiskScore) -> Self {
        let Classification { category, color } = risk_score.classify();
        Self {
            domain,
            risk_score,
            risk_category: category,
            risk_color: color,
            flood_probability: None,
            mudslide_probability: None,
        }
    }

    /// Score rounded to two decimals, as stored by the backend.
    pub fn rounded_score(&self) -> f64 {
        round2(self.risk_score.value())
    }
}

impl FloodingConditions {
    /// Normalized scenario this assessment feeds into the formula.
    pub fn to_scenario(&self) -> ScenarioInput {
        let rainfall_factor = normalize::rainfall_factor(self.predicted_rainfall_mm);
        let vulnerability = normalize::vulnerability_score(
            self.infrastructure_strength,
            self.soil_moisture_retention,
            self.vegetation_density,
            self.population_density,
        );
        ScenarioInput {
            infrastructure_strength: Some(self.infrastructure_strength),
            soil_moisture_retention: Some(self.soil_moisture_retention),
            vegetation_density: Some(self.vegetation_density),
            population_density: Some(self.population_density),
            predicted_rainfall_mm: Some(self.predicted_rainfall_mm),
            rainfall_factor: Some(rainfall_factor),
            flood_probability: Some(normalize::flood_probability(rainfall_factor, vulnerability)),
            ..ScenarioInput::default()
        }
    }
}

impl CycloneConditions {
    pub fn to_scenario(&self) -> ScenarioInput {
        ScenarioInput {
            infrastructure_strength: Some(self.infrastructure_strength),
            population_size: Some(self.population_size),
            wind_speed: Some(self.wind_speed_kmh),
            category: Some(f64::from(self.category)),
            distance_km: Some(self.distance_km),
            wind_factor: Some(normalize::wind_factor(self.wind_speed_kmh)),
            category_weight: Some(normalize::category_weight(f64::from(self.category))),
            distance_factor: Some(normalize::distance_factor(self.distance_km)),
            infrastructure_vulnerability: Some(normalize::infrastructure_vulnerability(
                self.infrastructure_strength,
            )),
            population_factor: Some(normalize::population_factor(self.population_size)),
            ..ScenarioInput::default()
        }
    }
}

pub fn assess_flooding(conditions: &FloodingConditions) -> Assessment {
    let scenario = conditions.to_scenario();
    let score = estimate(&scenario, Domain::Flooding);
    let mudslide = normalize::mudslide_probability(
        conditions.predicted_rainfall_mm,
        conditions.soil_moisture_retention,
        conditions.vegetation_density,
    );

    let mut out = Assessment::new(Domain::Flooding, score);
    out.flood_probability = scenario.flood_probability.map(round2);
    out.mudslide_probability = Some(round2(mudslide));
    log::debug!(
        "flooding assessment: rainfall={}mm score={} ({})",
        conditions.predicted_rainfall_mm,
        out.risk_score,
        out.risk_category
    );
    out
}

pub fn assess_cyclone(conditions: &CycloneConditions) -> Assessment {
    let score = estimate(&conditions.to_scenario(), Domain::Cyclone);
    let out = Assessment::new(Domain::Cyclone, score);
    log::debug!(
        "cyclone assessment: wind={}km/h category={} score={} ({})",
        conditions.wind_speed_kmh,
        conditions.category,
        out.risk_score,
        out.risk_category
    );
    out
}
