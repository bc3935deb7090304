use std::path::Path;

use riskcast_estimate::{assess_flooding, FloodingConditions};
use riskcast_score::{round2, RiskCategory, RiskColor};
use serde::{Deserialize, Serialize};

use crate::linear::{try_load, LinearModel, Model};

pub const LOADED_CONFIDENCE: f64 = 0.70;
pub const FALLBACK_CONFIDENCE: f64 = 0.55;

/// Rainfall below this does not raise the water level.
const WATER_LEVEL_ONSET_MM: f64 = 25.0;
/// Flood probability at or below this affects no area.
const AREA_ONSET_PROBABILITY: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloodingFeatures {
    pub rainfall_mm: f64,
    pub infrastructure_strength: f64,
    pub soil_moisture_retention: f64,
    pub vegetation_density: f64,
    pub population_density: f64,
    pub elevation: f64,
    pub drainage_capacity: f64,
    pub historical_flood_count: f64,
    pub base_area_km2: f64,
}

impl Default for FloodingFeatures {
    fn default() -> Self {
        Self {
            rainfall_mm: 0.0,
            infrastructure_strength: 5.0,
            soil_moisture_retention: 5.0,
            vegetation_density: 5.0,
            population_density: 100.0,
            elevation: 0.0,
            drainage_capacity: 5.0,
            historical_flood_count: 0.0,
            base_area_km2: 50.0,
        }
    }
}

impl FloodingFeatures {
    pub const LEN: usize = 8;

    pub fn to_array(&self) -> [f64; Self::LEN] {
        [
            self.rainfall_mm,
            self.infrastructure_strength,
            self.soil_moisture_retention,
            self.vegetation_density,
            self.population_density,
            self.elevation,
            self.drainage_capacity,
            self.historical_flood_count,
        ]
    }

    fn conditions(&self) -> FloodingConditions {
        FloodingConditions {
            predicted_rainfall_mm: self.rainfall_mm,
            infrastructure_strength: self.infrastructure_strength,
            soil_moisture_retention: self.soil_moisture_retention,
            vegetation_density: self.vegetation_density,
            population_density: self.population_density,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloodingForecast {
    pub flood_probability: f64,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub risk_color: RiskColor,
    pub mudslide_probability: f64,
    pub water_level_meters: f64,
    pub affected_area_km2: f64,
    pub affected_population: u64,
    pub confidence_score: f64,
}

/// Metres of standing water above the onset rainfall, reduced by drainage.
pub fn water_level_m(rainfall_mm: f64, drainage_capacity: f64) -> f64 {
    if rainfall_mm > WATER_LEVEL_ONSET_MM {
        (rainfall_mm - WATER_LEVEL_ONSET_MM) * 0.05 * (10.0 - drainage_capacity) / 10.0
    } else {
        0.0
    }
}

pub fn affected_area_km2(flood_probability: f64, base_area_km2: f64) -> f64 {
    if flood_probability > AREA_ONSET_PROBABILITY {
        base_area_km2 * flood_probability
    } else {
        0.0
    }
}

/// Flooding wrapper. Metrics always come from the calculator; a loaded
/// model only raises the reported confidence.
#[derive(Debug, Clone, Default)]
pub struct FloodingModel {
    model: Option<LinearModel>,
}

impl FloodingModel {
    pub fn fallback() -> Self {
        Self::default()
    }

    pub fn load(path: Option<&Path>) -> Self {
        Self {
            model: try_load(path, FloodingFeatures::LEN),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_ref().map(|m| m.name())
    }

    pub fn predict(&self, features: &FloodingFeatures) -> FloodingForecast {
        let assessment = assess_flooding(&features.conditions());
        let flood_probability = assessment.flood_probability.unwrap_or(0.0);

        let area = affected_area_km2(flood_probability, features.base_area_km2);
        let population = (area * features.population_density).max(0.0).floor() as u64;

        FloodingForecast {
            flood_probability,
            risk_score: assessment.rounded_score(),
            risk_category: assessment.risk_category,
            risk_color: assessment.risk_color,
            mudslide_probability: assessment.mudslide_probability.unwrap_or(0.0),
            water_level_meters: round2(water_level_m(features.rainfall_mm, features.drainage_capacity)),
            affected_area_km2: round2(area),
            affected_population: population,
            confidence_score: if self.is_loaded() {
                LOADED_CONFIDENCE
            } else {
                FALLBACK_CONFIDENCE
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn water_level_starts_above_25mm() {
        assert_eq!(water_level_m(25.0, 5.0), 0.0);
        // 75 * 0.05 * 5 / 10
        assert_abs_diff_eq!(water_level_m(100.0, 5.0), 1.875, epsilon = 1e-12);
        assert_eq!(water_level_m(100.0, 10.0), 0.0);
    }

    #[test]
    fn area_needs_probability_above_threshold() {
        assert_eq!(affected_area_km2(0.3, 50.0), 0.0);
        assert_abs_diff_eq!(affected_area_km2(0.7, 50.0), 35.0, epsilon = 1e-12);
    }

    #[test]
    fn dry_day_affects_nobody() {
        let f = FloodingModel::fallback().predict(&FloodingFeatures::default());
        assert_eq!(f.water_level_meters, 0.0);
        assert_eq!(f.affected_area_km2, 0.0);
        assert_eq!(f.affected_population, 0);
        assert_eq!(f.confidence_score, FALLBACK_CONFIDENCE);
        assert_eq!(f.risk_category, RiskCategory::Low);
    }

    #[test]
    fn heavy_rain_scenario() {
        // vulnerability 7.0 with saturated rainfall
        let features = FloodingFeatures {
            rainfall_mm: 125.0,
            infrastructure_strength: 2.0,
            soil_moisture_retention: 2.0,
            vegetation_density: 2.0,
            population_density: 4000.0,
            ..FloodingFeatures::default()
        };
        let f = FloodingModel::fallback().predict(&features);
        assert_abs_diff_eq!(f.flood_probability, 0.7, epsilon = 1e-9);
        assert_abs_diff_eq!(f.affected_area_km2, 35.0, epsilon = 1e-9);
        assert_abs_diff_eq!(f.water_level_meters, 2.5, epsilon = 1e-9);
        assert_abs_diff_eq!(f.mudslide_probability, 0.32, epsilon = 1e-9);
        assert_eq!(f.risk_score, 10.0);
        assert!(f.affected_population >= 139_999 && f.affected_population <= 140_000);
        assert_eq!(f.risk_category, RiskCategory::High);
    }
}
