//! Rows served by the prediction API.
//!
//! Decimal columns deserialize through [`crate::decimal`], so `"4.90"` and
//! `4.9` are equivalent. Dates stay as ISO-8601 strings; they compare
//! correctly as text and the engine never does calendar arithmetic.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::decimal;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "decimal::or_zero")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "decimal::or_zero")]
    pub longitude: f64,
    #[serde(default = "yes")]
    pub is_active: bool,
}

fn yes() -> bool {
    true
}

impl Location {
    /// "City, Country", or just the country when no city is set.
    pub fn label(&self) -> String {
        match self.city.as_deref().filter(|c| !c.is_empty()) {
            Some(city) => format!("{city}, {}", self.country),
            None => self.country.clone(),
        }
    }
}

/// Per-location defaults for the flooding calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationParameters {
    #[serde(default)]
    pub location: String,
    #[serde(default = "five", deserialize_with = "decimal::or_five")]
    pub infrastructure_strength: f64,
    #[serde(default = "five", deserialize_with = "decimal::or_five")]
    pub soil_moisture_retention: f64,
    #[serde(default)]
    pub soil_type: String,
    #[serde(default = "five", deserialize_with = "decimal::or_five")]
    pub vegetation_density: f64,
    #[serde(default)]
    pub population_size: u64,
    #[serde(default, deserialize_with = "decimal::or_zero")]
    pub population_density: f64,
}

fn five() -> f64 {
    5.0
}

impl Default for LocationParameters {
    fn default() -> Self {
        Self {
            location: String::new(),
            infrastructure_strength: 5.0,
            soil_moisture_retention: 5.0,
            soil_type: String::new(),
            vegetation_density: 5.0,
            population_size: 0,
            population_density: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RainfallPrediction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub location_details: Option<Location>,
    #[serde(default)]
    pub prediction_date: String,
    #[serde(default)]
    pub prediction_time: Option<String>,
    #[serde(default, deserialize_with = "decimal::or_zero")]
    pub predicted_rainfall_mm: f64,
    #[serde(default)]
    pub intensity: String,
    #[serde(default, deserialize_with = "decimal::optional")]
    pub humidity_percent: Option<f64>,
    #[serde(default, deserialize_with = "decimal::optional")]
    pub wind_speed_kmh: Option<f64>,
    #[serde(default, deserialize_with = "decimal::optional")]
    pub air_pressure_hpa: Option<f64>,
    #[serde(default, deserialize_with = "decimal::or_zero")]
    pub confidence_score: f64,
    #[serde(default)]
    pub is_historical: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FloodingPrediction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub location_details: Option<Location>,
    #[serde(default)]
    pub prediction_date: String,
    #[serde(default, deserialize_with = "decimal::or_zero")]
    pub flood_probability: f64,
    #[serde(default, deserialize_with = "decimal::or_zero")]
    pub affected_area_km2: f64,
    #[serde(default, deserialize_with = "decimal::or_zero")]
    pub water_level_meters: f64,
    #[serde(default, deserialize_with = "decimal::optional")]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub risk_category: Option<String>,
    #[serde(default, deserialize_with = "decimal::or_zero")]
    pub mudslide_probability: f64,
    #[serde(default)]
    pub affected_population: u64,
    #[serde(default, deserialize_with = "decimal::or_zero")]
    pub confidence_score: f64,
    #[serde(default)]
    pub is_historical: bool,
}

/// When a track point is reached. Forecast tracks count whole hours from
/// the prediction time; archived tracks carry ISO timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TrackTime {
    Hours(u32),
    Iso(String),
}

impl fmt::Display for TrackTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackTime::Hours(h) => write!(f, "+{h}h"),
            TrackTime::Iso(s) => f.write_str(s),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseTime {
    Hours(u32),
    Fractional(f64),
    Iso(String),
    Other(serde::de::IgnoredAny),
}

// anything else (negative, object, list) reads as "no timestamp"
fn track_time<'de, D: Deserializer<'de>>(d: D) -> Result<Option<TrackTime>, D::Error> {
    Ok(match Option::<LooseTime>::deserialize(d)? {
        Some(LooseTime::Hours(h)) => Some(TrackTime::Hours(h)),
        Some(LooseTime::Fractional(x))
            if x.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&x) =>
        {
            Some(TrackTime::Hours(x as u32))
        }
        Some(LooseTime::Iso(s)) => Some(TrackTime::Iso(s)),
        _ => None,
    })
}

/// One point of a forecast cyclone track.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathPoint {
    #[serde(default, deserialize_with = "decimal::or_zero")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "decimal::or_zero")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "track_time")]
    pub timestamp: Option<TrackTime>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CyclonePrediction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub cyclone_name: String,
    #[serde(default)]
    pub prediction_date: String,
    #[serde(default)]
    pub category: u8,
    #[serde(default, deserialize_with = "decimal::or_zero")]
    pub max_wind_speed_kmh: f64,
    #[serde(default, deserialize_with = "decimal::optional")]
    pub central_pressure_hpa: Option<f64>,
    #[serde(default)]
    pub path_coordinates: Vec<PathPoint>,
    #[serde(default)]
    pub affected_locations: Vec<String>,
    #[serde(default, deserialize_with = "decimal::optional")]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub risk_category: Option<String>,
    #[serde(default)]
    pub estimated_landfall_date: Option<String>,
    #[serde(default, deserialize_with = "decimal::or_zero")]
    pub confidence_score: f64,
    #[serde(default)]
    pub is_historical: bool,
}

/// One hourly weather reading. Every measurement may be missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherObservation {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, deserialize_with = "decimal::optional")]
    pub temperature_celsius: Option<f64>,
    #[serde(default, deserialize_with = "decimal::optional")]
    pub humidity_percent: Option<f64>,
    #[serde(default, deserialize_with = "decimal::optional")]
    pub rainfall_mm: Option<f64>,
    #[serde(default, deserialize_with = "decimal::optional")]
    pub air_pressure_hpa: Option<f64>,
    #[serde(default, deserialize_with = "decimal::optional")]
    pub wind_speed_kmh: Option<f64>,
    #[serde(default, deserialize_with = "decimal::optional")]
    pub wind_direction: Option<f64>,
    #[serde(default, deserialize_with = "decimal::optional")]
    pub cloud_cover_percent: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flooding_row_with_string_decimals() {
        let row: FloodingPrediction = serde_json::from_str(
            r#"{
                "id": "f1",
                "location": "loc-1",
                "prediction_date": "2024-06-01",
                "flood_probability": "0.45",
                "risk_score": "6.10",
                "risk_category": "Medium",
                "affected_population": 1200,
                "is_historical": false
            }"#,
        )
        .unwrap();
        assert_eq!(row.flood_probability, 0.45);
        assert_eq!(row.risk_score, Some(6.1));
        assert_eq!(row.water_level_meters, 0.0);
        assert_eq!(row.affected_population, 1200);
    }

    #[test]
    fn cyclone_path_points() {
        let row: CyclonePrediction = serde_json::from_str(
            r#"{"cyclone_name": "Amara", "category": 3,
                "path_coordinates": [{"latitude": "-18.5", "longitude": 57.2}]}"#,
        )
        .unwrap();
        assert_eq!(row.path_coordinates.len(), 1);
        assert_eq!(row.path_coordinates[0].latitude, -18.5);
        assert_eq!(row.path_coordinates[0].timestamp, None);
    }

    #[test]
    fn predict_response_track_hours() {
        let row: CyclonePrediction = serde_json::from_str(
            r#"{"cyclone_name": "Predicted", "category": 2, "max_wind_speed_kmh": 160.0,
                "path_coordinates": [
                    {"latitude": 15.0, "longitude": 120.0, "timestamp": 0},
                    {"latitude": 15.0, "longitude": 119.0, "timestamp": 6},
                    {"latitude": 15.1, "longitude": 118.0, "timestamp": 12.0},
                    {"latitude": 15.2, "longitude": 117.0, "timestamp": "2024-05-26T18:00"},
                    {"latitude": 15.3, "longitude": 116.0, "timestamp": -6}
                ]}"#,
        )
        .unwrap();
        let times: Vec<Option<TrackTime>> = row
            .path_coordinates
            .iter()
            .map(|p| p.timestamp.clone())
            .collect();
        assert_eq!(
            times,
            vec![
                Some(TrackTime::Hours(0)),
                Some(TrackTime::Hours(6)),
                Some(TrackTime::Hours(12)),
                Some(TrackTime::Iso("2024-05-26T18:00".into())),
                None,
            ]
        );
        assert_eq!(times[1].as_ref().unwrap().to_string(), "+6h");
    }

    #[test]
    fn track_hours_serialize_as_integers() {
        let p = PathPoint {
            latitude: 15.0,
            longitude: 120.0,
            timestamp: Some(TrackTime::Hours(6)),
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["timestamp"], serde_json::json!(6));
    }

    #[test]
    fn location_parameters_default_to_midpoint() {
        let p: LocationParameters = serde_json::from_str(r#"{"location": "loc-1"}"#).unwrap();
        assert_eq!(p.infrastructure_strength, 5.0);
        assert_eq!(p.vegetation_density, 5.0);
        assert_eq!(p.population_density, 0.0);
    }

    #[test]
    fn location_label() {
        let mut loc = Location {
            country: "Mauritius".into(),
            ..Location::default()
        };
        assert_eq!(loc.label(), "Mauritius");
        loc.city = Some("Port Louis".into());
        assert_eq!(loc.label(), "Port Louis, Mauritius");
    }
}
