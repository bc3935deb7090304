use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::normalize;

/// Numeric factors a scenario may carry.
///
/// Raw measurements (`PredictedRainfallMm`, `WindSpeed`, ...) are what the
/// scenario form collects; normalized factors (`RainfallFactor`,
/// `WindFactor`, ...) are what the formulas consume.
/// [`ScenarioInput::normalized`] derives the latter from the former.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Factor {
    InfrastructureStrength,
    SoilMoistureRetention,
    VegetationDensity,
    PopulationSize,
    PopulationDensity,
    PredictedRainfallMm,
    WindSpeed,
    Pressure,
    Category,
    DistanceKm,
    RainfallFactor,
    FloodProbability,
    WindFactor,
    CategoryWeight,
    DistanceFactor,
    InfrastructureVulnerability,
    PopulationFactor,
}

impl Factor {
    pub const ALL: [Factor; 17] = [
        Factor::InfrastructureStrength,
        Factor::SoilMoistureRetention,
        Factor::VegetationDensity,
        Factor::PopulationSize,
        Factor::PopulationDensity,
        Factor::PredictedRainfallMm,
        Factor::WindSpeed,
        Factor::Pressure,
        Factor::Category,
        Factor::DistanceKm,
        Factor::RainfallFactor,
        Factor::FloodProbability,
        Factor::WindFactor,
        Factor::CategoryWeight,
        Factor::DistanceFactor,
        Factor::InfrastructureVulnerability,
        Factor::PopulationFactor,
    ];

    /// snake_case name used in scenario files and API payloads.
    pub fn name(self) -> &'static str {
        match self {
            Factor::InfrastructureStrength => "infrastructure_strength",
            Factor::SoilMoistureRetention => "soil_moisture_retention",
            Factor::VegetationDensity => "vegetation_density",
            Factor::PopulationSize => "population_size",
            Factor::PopulationDensity => "population_density",
            Factor::PredictedRainfallMm => "predicted_rainfall_mm",
            Factor::WindSpeed => "wind_speed",
            Factor::Pressure => "pressure",
            Factor::Category => "category",
            Factor::DistanceKm => "distance_km",
            Factor::RainfallFactor => "rainfall_factor",
            Factor::FloodProbability => "flood_probability",
            Factor::WindFactor => "wind_factor",
            Factor::CategoryWeight => "category_weight",
            Factor::DistanceFactor => "distance_factor",
            Factor::InfrastructureVulnerability => "infrastructure_vulnerability",
            Factor::PopulationFactor => "population_factor",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Factor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scenario factor '{0}'")]
pub struct UnknownFactor(pub String);

impl FromStr for Factor {
    type Err = UnknownFactor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        let factor = match key {
            // short spellings accepted by the scenario form
            "rainfall_mm" => Some(Factor::PredictedRainfallMm),
            "wind_speed_kmh" => Some(Factor::WindSpeed),
            "pressure_hpa" => Some(Factor::Pressure),
            _ => Factor::ALL.iter().copied().find(|f| f.name() == key),
        };
        factor.ok_or_else(|| UnknownFactor(key.to_string()))
    }
}

/// Named factors for one custom scenario evaluation.
///
/// Every factor is optional. Values are stored only when finite; setting
/// NaN or an infinity clears the factor instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioInput {
    pub infrastructure_strength: Option<f64>,
    pub soil_moisture_retention: Option<f64>,
    pub soil_type: Option<String>,
    pub vegetation_density: Option<f64>,
    pub population_size: Option<f64>,
    pub population_density: Option<f64>,
    pub predicted_rainfall_mm: Option<f64>,
    pub wind_speed: Option<f64>,
    pub pressure: Option<f64>,
    pub category: Option<f64>,
    pub distance_km: Option<f64>,
    pub rainfall_factor: Option<f64>,
    pub flood_probability: Option<f64>,
    pub wind_factor: Option<f64>,
    pub category_weight: Option<f64>,
    pub distance_factor: Option<f64>,
    pub infrastructure_vulnerability: Option<f64>,
    pub population_factor: Option<f64>,
}

impl ScenarioInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`ScenarioInput::set`].
    pub fn with(mut self, factor: Factor, value: f64) -> Self {
        self.set(factor, value);
        self
    }

    /// Store a factor. Non-finite values clear it.
    pub fn set(&mut self, factor: Factor, value: f64) {
        let slot = self.slot_mut(factor);
        if value.is_finite() {
            *slot = Some(value);
        } else {
            log::debug!("scenario factor {factor} ignored non-finite value {value}");
            *slot = None;
        }
    }

    pub fn clear(&mut self, factor: Factor) {
        *self.slot_mut(factor) = None;
    }

    /// Value of a factor, if present and finite.
    pub fn get(&self, factor: Factor) -> Option<f64> {
        let v = match factor {
            Factor::InfrastructureStrength => self.infrastructure_strength,
            Factor::SoilMoistureRetention => self.soil_moisture_retention,
            Factor::VegetationDensity => self.vegetation_density,
            Factor::PopulationSize => self.population_size,
            Factor::PopulationDensity => self.population_density,
            Factor::PredictedRainfallMm => self.predicted_rainfall_mm,
            Factor::WindSpeed => self.wind_speed,
            Factor::Pressure => self.pressure,
            Factor::Category => self.category,
            Factor::DistanceKm => self.distance_km,
            Factor::RainfallFactor => self.rainfall_factor,
            Factor::FloodProbability => self.flood_probability,
            Factor::WindFactor => self.wind_factor,
            Factor::CategoryWeight => self.category_weight,
            Factor::DistanceFactor => self.distance_factor,
            Factor::InfrastructureVulnerability => self.infrastructure_vulnerability,
            Factor::PopulationFactor => self.population_factor,
        };
        // fields are public, so a deserialized NaN can still slip in
        v.filter(|x| x.is_finite())
    }

    /// Number of numeric factors present.
    pub fn len(&self) -> usize {
        Factor::ALL.iter().filter(|f| self.get(**f).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill normalized factors that are absent but derivable from raw
    /// measurements. Factors already present are left untouched.
    ///
    /// `flood_probability` needs `predicted_rainfall_mm` plus the three site
    /// factors; a bare `rainfall_factor` is not enough to derive it.
    pub fn normalized(&self) -> ScenarioInput {
        let mut out = self.clone();
        let raw_rainfall = self.get(Factor::PredictedRainfallMm).map(normalize::rainfall_factor);

        if out.rainfall_factor.is_none() {
            out.rainfall_factor = raw_rainfall;
        }
        if out.flood_probability.is_none() {
            if let (Some(rf), Some(infra), Some(soil), Some(veg)) = (
                raw_rainfall,
                self.get(Factor::InfrastructureStrength),
                self.get(Factor::SoilMoistureRetention),
                self.get(Factor::VegetationDensity),
            ) {
                let density = self.get(Factor::PopulationDensity).unwrap_or(0.0);
                let vulnerability = normalize::vulnerability_score(infra, soil, veg, density);
                out.flood_probability = Some(normalize::flood_probability(rf, vulnerability));
            }
        }
        if out.wind_factor.is_none() {
            out.wind_factor = self.get(Factor::WindSpeed).map(normalize::wind_factor);
        }
        if out.category_weight.is_none() {
            out.category_weight = self.get(Factor::Category).map(normalize::category_weight);
        }
        if out.distance_factor.is_none() {
            out.distance_factor = self.get(Factor::DistanceKm).map(normalize::distance_factor);
        }
        if out.infrastructure_vulnerability.is_none() {
            out.infrastructure_vulnerability = self
                .get(Factor::InfrastructureStrength)
                .map(normalize::infrastructure_vulnerability);
        }
        if out.population_factor.is_none() {
            out.population_factor = self.get(Factor::PopulationSize).map(normalize::population_factor);
        }
        out
    }

    fn slot_mut(&mut self, factor: Factor) -> &mut Option<f64> {
        match factor {
            Factor::InfrastructureStrength => &mut self.infrastructure_strength,
            Factor::SoilMoistureRetention => &mut self.soil_moisture_retention,
            Factor::VegetationDensity => &mut self.vegetation_density,
            Factor::PopulationSize => &mut self.population_size,
            Factor::PopulationDensity => &mut self.population_density,
            Factor::PredictedRainfallMm => &mut self.predicted_rainfall_mm,
            Factor::WindSpeed => &mut self.wind_speed,
            Factor::Pressure => &mut self.pressure,
            Factor::Category => &mut self.category,
            Factor::DistanceKm => &mut self.distance_km,
            Factor::RainfallFactor => &mut self.rainfall_factor,
            Factor::FloodProbability => &mut self.flood_probability,
            Factor::WindFactor => &mut self.wind_factor,
            Factor::CategoryWeight => &mut self.category_weight,
            Factor::DistanceFactor => &mut self.distance_factor,
            Factor::InfrastructureVulnerability => &mut self.infrastructure_vulnerability,
            Factor::PopulationFactor => &mut self.population_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;

    #[test]
    fn factor_names_round_trip() {
        for f in Factor::ALL {
            assert_eq!(f.name().parse::<Factor>(), Ok(f));
        }
        assert_eq!("rainfall_mm".parse::<Factor>(), Ok(Factor::PredictedRainfallMm));
        assert!("soil_type".parse::<Factor>().is_err());
    }

    #[test]
    fn non_finite_values_clear_the_factor() {
        let mut input = ScenarioInput::new().with(Factor::WindFactor, 0.4);
        assert_eq!(input.get(Factor::WindFactor), Some(0.4));
        input.set(Factor::WindFactor, f64::NAN);
        assert_eq!(input.get(Factor::WindFactor), None);
        input.set(Factor::WindFactor, f64::INFINITY);
        assert!(input.is_empty());
    }

    #[test]
    fn normalized_derives_missing_factors() {
        let input = ScenarioInput::new()
            .with(Factor::PredictedRainfallMm, 150.0)
            .with(Factor::WindSpeed, 125.0)
            .with(Factor::Category, 4.0)
            .with(Factor::DistanceKm, 250.0)
            .with(Factor::InfrastructureStrength, 6.0)
            .with(Factor::PopulationSize, 250_000.0);
        let n = input.normalized();
        assert_eq!(n.rainfall_factor, Some(1.0));
        assert_eq!(n.wind_factor, Some(0.5));
        assert_abs_diff_eq!(n.category_weight.unwrap(), 0.8, epsilon = 1e-12);
        assert_eq!(n.distance_factor, Some(0.5));
        assert_abs_diff_eq!(n.infrastructure_vulnerability.unwrap(), 0.4, epsilon = 1e-12);
        assert_eq!(n.population_factor, Some(0.25));
        // soil and vegetation are missing, so no flood probability
        assert_eq!(n.flood_probability, None);
    }

    #[test]
    fn flood_probability_needs_raw_rainfall() {
        let site = ScenarioInput::new()
            .with(Factor::InfrastructureStrength, 2.0)
            .with(Factor::SoilMoistureRetention, 2.0)
            .with(Factor::VegetationDensity, 2.0)
            .with(Factor::PopulationDensity, 4000.0);

        let typed = site.clone().with(Factor::RainfallFactor, 1.0).normalized();
        assert_eq!(typed.flood_probability, None);
        assert_eq!(typed.rainfall_factor, Some(1.0));

        let measured = site.with(Factor::PredictedRainfallMm, 200.0).normalized();
        assert_abs_diff_eq!(measured.flood_probability.unwrap(), 0.7, epsilon = 1e-12);
    }

    #[test]
    fn normalized_keeps_explicit_factors() {
        let input = ScenarioInput::new()
            .with(Factor::PredictedRainfallMm, 150.0)
            .with(Factor::RainfallFactor, 0.2);
        assert_eq!(input.normalized().rainfall_factor, Some(0.2));
    }

    #[test]
    fn deserializes_partial_json() {
        let input: ScenarioInput =
            serde_json::from_str(r#"{"infrastructure_strength": 8, "soil_type": "clay"}"#).unwrap();
        assert_eq!(input.get(Factor::InfrastructureStrength), Some(8.0));
        assert_eq!(input.soil_type.as_deref(), Some("clay"));
        assert_eq!(input.len(), 1);
    }
}
