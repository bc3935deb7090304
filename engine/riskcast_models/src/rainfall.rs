use std::path::Path;

use riskcast_records::WeatherObservation;
use riskcast_score::{round2, RainfallIntensity};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::linear::{try_load, LinearModel};

pub const LOADED_CONFIDENCE: f64 = 0.75;
pub const FALLBACK_CONFIDENCE: f64 = 0.50;

/// Model inputs, in the order the linear model's weights expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainfallFeatures {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub cloud_cover: f64,
    pub historical_avg_rainfall: f64,
}

impl Default for RainfallFeatures {
    fn default() -> Self {
        Self {
            temperature: 25.0,
            humidity: 60.0,
            pressure: 1013.0,
            wind_speed: 10.0,
            cloud_cover: 0.0,
            historical_avg_rainfall: 0.0,
        }
    }
}

impl RainfallFeatures {
    pub const LEN: usize = 6;

    pub fn to_array(&self) -> [f64; Self::LEN] {
        [
            self.temperature,
            self.humidity,
            self.pressure,
            self.wind_speed,
            self.cloud_cover,
            self.historical_avg_rainfall,
        ]
    }
}

/// Features for one hourly reading, with defaults for missing values.
///
/// Cloud cover is not taken from the reading; the forecast endpoint does
/// not request it and the fallback rule treats 0 as "unknown".
pub fn features_from_observation(obs: &WeatherObservation) -> RainfallFeatures {
    let d = RainfallFeatures::default();
    RainfallFeatures {
        temperature: obs.temperature_celsius.unwrap_or(d.temperature),
        humidity: obs.humidity_percent.unwrap_or(d.humidity),
        pressure: obs.air_pressure_hpa.unwrap_or(d.pressure),
        wind_speed: obs.wind_speed_kmh.unwrap_or(d.wind_speed),
        ..d
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RainfallForecast {
    pub predicted_rainfall_mm: f64,
    pub intensity: RainfallIntensity,
    pub confidence_score: f64,
}

impl RainfallForecast {
    fn new(mm: f64, confidence_score: f64) -> Self {
        Self {
            predicted_rainfall_mm: mm,
            intensity: RainfallIntensity::from_mm(mm),
            confidence_score,
        }
    }
}

/// Rule used without a model: rain only when it is humid, the pressure
/// is low and the sky is mostly covered.
pub fn fallback_rainfall_mm(f: &RainfallFeatures) -> f64 {
    if f.humidity > 70.0 && f.pressure < 1010.0 && f.cloud_cover > 60.0 {
        let mm = (f.humidity - 70.0) * 0.5 + (1010.0 - f.pressure) * 2.0 + (f.cloud_cover - 60.0) * 0.3;
        round2(mm.max(0.0))
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct RainfallModel {
    model: Option<LinearModel>,
}

impl RainfallModel {
    /// Wrapper with no model; every prediction uses the fallback rule.
    pub fn fallback() -> Self {
        Self::default()
    }

    pub fn with_model(model: LinearModel) -> Result<Self, ModelError> {
        Ok(Self {
            model: Some(model.expect_features(RainfallFeatures::LEN)?),
        })
    }

    /// Never fails; an unusable file leaves the wrapper in fallback mode.
    pub fn load(path: Option<&Path>) -> Self {
        Self {
            model: try_load(path, RainfallFeatures::LEN),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn predict(&self, features: &RainfallFeatures) -> RainfallForecast {
        if let Some(model) = &self.model {
            match model.predict(&features.to_array()) {
                Ok(mm) if mm.is_finite() => return RainfallForecast::new(mm.max(0.0), LOADED_CONFIDENCE),
                Ok(mm) => log::warn!("rainfall model produced {mm}; using fallback"),
                Err(e) => log::warn!("{e}; using fallback"),
            }
        }
        RainfallForecast::new(fallback_rainfall_mm(features), FALLBACK_CONFIDENCE)
    }

    /// Forecast for the first `limit` hourly readings, keyed by timestamp.
    pub fn forecast_hourly(
        &self,
        observations: &[WeatherObservation],
        limit: usize,
    ) -> Vec<(String, RainfallForecast)> {
        observations
            .iter()
            .take(limit)
            .map(|obs| {
                let forecast = self.predict(&features_from_observation(obs));
                (obs.timestamp.clone(), forecast)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn wet() -> RainfallFeatures {
        RainfallFeatures {
            humidity: 90.0,
            pressure: 1000.0,
            cloud_cover: 80.0,
            ..RainfallFeatures::default()
        }
    }

    #[test]
    fn fallback_needs_all_three_conditions() {
        // 20*0.5 + 10*2 + 20*0.3
        assert_abs_diff_eq!(fallback_rainfall_mm(&wet()), 36.0);
        assert_eq!(fallback_rainfall_mm(&RainfallFeatures { humidity: 70.0, ..wet() }), 0.0);
        assert_eq!(fallback_rainfall_mm(&RainfallFeatures { pressure: 1010.0, ..wet() }), 0.0);
        assert_eq!(fallback_rainfall_mm(&RainfallFeatures { cloud_cover: 60.0, ..wet() }), 0.0);
    }

    #[test]
    fn fallback_forecast() {
        let f = RainfallModel::fallback().predict(&wet());
        assert_eq!(f.intensity, RainfallIntensity::Heavy);
        assert_eq!(f.confidence_score, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn loaded_model_is_floored_at_zero() {
        let m = RainfallModel::with_model(LinearModel::new(
            "r",
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            -5.0,
        ))
        .unwrap();
        assert!(m.is_loaded());
        let f = m.predict(&RainfallFeatures::default());
        assert_eq!(f.predicted_rainfall_mm, 0.0);
        assert_eq!(f.confidence_score, LOADED_CONFIDENCE);

        let f = m.predict(&RainfallFeatures {
            historical_avg_rainfall: 60.0,
            ..RainfallFeatures::default()
        });
        assert_abs_diff_eq!(f.predicted_rainfall_mm, 55.0);
        assert_eq!(f.intensity, RainfallIntensity::Extreme);
    }

    #[test]
    fn wrong_width_model_rejected() {
        assert!(RainfallModel::with_model(LinearModel::new("r", vec![1.0], 0.0)).is_err());
    }

    #[test]
    fn observation_defaults() {
        let obs = WeatherObservation {
            humidity_percent: Some(88.0),
            cloud_cover_percent: Some(95.0),
            ..WeatherObservation::default()
        };
        let f = features_from_observation(&obs);
        assert_eq!(f.humidity, 88.0);
        assert_eq!(f.temperature, 25.0);
        assert_eq!(f.pressure, 1013.0);
        assert_eq!(f.wind_speed, 10.0);
        assert_eq!(f.cloud_cover, 0.0);
    }

    #[test]
    fn hourly_forecast_respects_limit() {
        let obs: Vec<WeatherObservation> = (0..5)
            .map(|i| WeatherObservation {
                timestamp: format!("t{i}"),
                ..WeatherObservation::default()
            })
            .collect();
        let out = RainfallModel::fallback().forecast_hourly(&obs, 3);
        assert_eq!(out.len(), 3);
        assert_eq!(out[2].0, "t2");
        assert_eq!(out[0].1.predicted_rainfall_mm, 0.0);
    }
}
