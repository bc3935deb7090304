use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::envelope::ApiResponse;
use crate::error::RecordsError;
use crate::filter::RecordFilter;
use crate::record::{
    CyclonePrediction, FloodingPrediction, Location, LocationParameters, PathPoint,
    RainfallPrediction, TrackTime,
};

/// Anything that can answer the dashboard's prediction queries.
pub trait PredictionSource {
    fn locations(&self) -> Vec<Location>;
    fn location_parameters(&self, location_id: &str) -> Option<LocationParameters>;
    fn rainfall(&self, filter: &RecordFilter) -> Vec<RainfallPrediction>;
    fn flooding(&self, filter: &RecordFilter) -> Vec<FloodingPrediction>;
    fn cyclones(&self, filter: &RecordFilter) -> Vec<CyclonePrediction>;
}

/// Source backed by vectors, for offline use and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub locations: Vec<Location>,
    pub parameters: Vec<LocationParameters>,
    pub rainfall: Vec<RainfallPrediction>,
    pub flooding: Vec<FloodingPrediction>,
    pub cyclones: Vec<CyclonePrediction>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Dump {
    locations: Option<Value>,
    location_parameters: Option<Value>,
    rainfall_predictions: Option<Value>,
    flooding_predictions: Option<Value>,
    cyclone_predictions: Option<Value>,
}

fn section<T: serde::de::DeserializeOwned>(
    name: &str,
    value: Option<Value>,
) -> Result<Vec<T>, RecordsError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(v) => ApiResponse::from_value(v)?.into_records().map_err(|e| {
            log::warn!("dump section '{name}' rejected: {e}");
            e
        }),
    }
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dump object whose keys name the collections
    /// (`locations`, `rainfall_predictions`, ...). Each value may be any
    /// response shape [`ApiResponse`] understands.
    pub fn from_json(text: &str) -> Result<Self, RecordsError> {
        let dump: Dump = serde_json::from_str(text)?;
        let source = Self {
            locations: section("locations", dump.locations)?,
            parameters: section("location_parameters", dump.location_parameters)?,
            rainfall: section("rainfall_predictions", dump.rainfall_predictions)?,
            flooding: section("flooding_predictions", dump.flooding_predictions)?,
            cyclones: section("cyclone_predictions", dump.cyclone_predictions)?,
        };
        log::debug!(
            "loaded dump: {} locations, {} rainfall, {} flooding, {} cyclone",
            source.locations.len(),
            source.rainfall.len(),
            source.flooding.len(),
            source.cyclones.len()
        );
        Ok(source)
    }

    pub fn load(path: &Path) -> Result<Self, RecordsError> {
        let text = fs::read_to_string(path).map_err(|source| RecordsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Small fixed data set covering every category.
    pub fn sample() -> Self {
        let kisumu = Location {
            id: "loc-kisumu".into(),
            country: "Kenya".into(),
            region: Some("Nyanza".into()),
            city: Some("Kisumu".into()),
            latitude: -0.0917,
            longitude: 34.768,
            is_active: true,
        };
        let dhaka = Location {
            id: "loc-dhaka".into(),
            country: "Bangladesh".into(),
            region: None,
            city: Some("Dhaka".into()),
            latitude: 23.8103,
            longitude: 90.4125,
            is_active: true,
        };

        let rain = |loc: &Location, date: &str, mm: f64, intensity: &str| RainfallPrediction {
            id: format!("rain-{}-{date}", loc.id),
            location: loc.id.clone(),
            prediction_date: date.into(),
            predicted_rainfall_mm: mm,
            intensity: intensity.into(),
            confidence_score: 0.75,
            ..RainfallPrediction::default()
        };
        let flood = |loc: &Location, date: &str, p: f64, score: f64, cat: &str| FloodingPrediction {
            id: format!("flood-{}-{date}", loc.id),
            location: loc.id.clone(),
            location_details: Some(loc.clone()),
            prediction_date: date.into(),
            flood_probability: p,
            risk_score: Some(score),
            risk_category: Some(cat.into()),
            confidence_score: 0.7,
            ..FloodingPrediction::default()
        };

        Self {
            parameters: vec![
                LocationParameters {
                    location: kisumu.id.clone(),
                    infrastructure_strength: 4.0,
                    soil_moisture_retention: 6.0,
                    soil_type: "clay".into(),
                    vegetation_density: 5.0,
                    population_size: 610_000,
                    population_density: 2000.0,
                },
                LocationParameters {
                    location: dhaka.id.clone(),
                    infrastructure_strength: 5.5,
                    soil_moisture_retention: 7.0,
                    soil_type: "alluvial".into(),
                    vegetation_density: 3.0,
                    population_size: 10_200_000,
                    population_density: 23_000.0,
                },
            ],
            rainfall: vec![
                rain(&kisumu, "2024-06-01", 1.2, "Light"),
                rain(&kisumu, "2024-06-02", 18.0, "Heavy"),
                rain(&dhaka, "2024-06-01", 62.5, "Extreme"),
            ],
            flooding: vec![
                flood(&kisumu, "2024-06-01", 0.1, 2.1, "Low"),
                flood(&kisumu, "2024-06-02", 0.45, 4.9, "Medium"),
                flood(&dhaka, "2024-06-01", 0.8, 8.3, "High"),
            ],
            cyclones: vec![CyclonePrediction {
                id: "cyc-1".into(),
                cyclone_name: "Remal".into(),
                prediction_date: "2024-05-26".into(),
                category: 1,
                max_wind_speed_kmh: 120.0,
                central_pressure_hpa: Some(978.0),
                path_coordinates: vec![
                    PathPoint {
                        latitude: 21.0,
                        longitude: 89.5,
                        timestamp: Some(TrackTime::Iso("2024-05-26T00:00".into())),
                    },
                    PathPoint {
                        latitude: 21.8,
                        longitude: 89.8,
                        timestamp: Some(TrackTime::Iso("2024-05-26T06:00".into())),
                    },
                ],
                affected_locations: vec![dhaka.id.clone()],
                risk_score: Some(6.4),
                risk_category: Some("Medium".into()),
                confidence_score: 0.65,
                ..CyclonePrediction::default()
            }],
            locations: vec![kisumu, dhaka],
        }
    }
}

impl PredictionSource for InMemorySource {
    fn locations(&self) -> Vec<Location> {
        self.locations.iter().filter(|l| l.is_active).cloned().collect()
    }

    fn location_parameters(&self, location_id: &str) -> Option<LocationParameters> {
        self.parameters
            .iter()
            .find(|p| p.location == location_id)
            .cloned()
    }

    fn rainfall(&self, filter: &RecordFilter) -> Vec<RainfallPrediction> {
        self.rainfall.iter().filter(|r| filter.matches(*r)).cloned().collect()
    }

    fn flooding(&self, filter: &RecordFilter) -> Vec<FloodingPrediction> {
        self.flooding.iter().filter(|r| filter.matches(*r)).cloned().collect()
    }

    fn cyclones(&self, filter: &RecordFilter) -> Vec<CyclonePrediction> {
        self.cyclones.iter().filter(|r| filter.matches(*r)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sample_filters_by_location() {
        let src = InMemorySource::sample();
        let f = RecordFilter::new().location("loc-kisumu");
        assert_eq!(src.flooding(&f).len(), 2);
        assert_eq!(src.rainfall(&f).len(), 2);
        assert_eq!(src.cyclones(&f).len(), 1);
        assert_eq!(src.locations().len(), 2);
        assert_eq!(
            src.location_parameters("loc-dhaka").map(|p| p.soil_type),
            Some("alluvial".to_string())
        );
        assert!(src.location_parameters("nowhere").is_none());
    }

    #[test]
    fn dump_accepts_mixed_shapes() {
        let src = InMemorySource::from_json(
            r#"{
                "locations": [{"id": "a", "country": "X", "is_active": false}],
                "flooding_predictions": {"count": 1, "results": [{"id": "f", "risk_score": "5.5"}]},
                "cyclone_predictions": {"predictions": []}
            }"#,
        )
        .unwrap();
        assert_eq!(src.locations.len(), 1);
        assert!(src.locations().is_empty());
        assert_eq!(src.flooding[0].risk_score, Some(5.5));
        assert!(src.rainfall.is_empty());
    }

    #[test]
    fn dump_with_error_section_fails() {
        let err = InMemorySource::from_json(r#"{"rainfall_predictions": {"error": "boom"}}"#).unwrap_err();
        assert!(matches!(err, RecordsError::Api(_)));
    }
}
