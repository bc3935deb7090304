use std::path::Path;

use rand::Rng;
use riskcast_estimate::{assess_cyclone, CycloneConditions};
use riskcast_records::{PathPoint, TrackTime};
use riskcast_score::{round2, RiskCategory, RiskColor};
use serde::{Deserialize, Serialize};

use crate::linear::{try_load, LinearModel};

pub const LOADED_CONFIDENCE: f64 = 0.65;
pub const FALLBACK_CONFIDENCE: f64 = 0.50;

const MPH_PER_KMH: f64 = 0.621371;
/// Lower mph bound of categories 1 through 5.
const CATEGORY_FLOORS_MPH: [f64; 5] = [74.0, 96.0, 111.0, 130.0, 157.0];

pub const TRACK_STEPS: usize = 12;
pub const STEP_HOURS: u32 = 6;
const KM_PER_DEGREE: f64 = 111.0;
const MAX_TURN_DEG: f64 = 15.0;

/// Saffir–Simpson category (0 below hurricane strength) for a sustained
/// wind speed in km/h.
pub fn saffir_simpson_category(wind_speed_kmh: f64) -> u8 {
    let mph = wind_speed_kmh * MPH_PER_KMH;
    CATEGORY_FLOORS_MPH.iter().filter(|floor| mph >= **floor).count() as u8
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

fn track(
    latitude: f64,
    longitude: f64,
    mut heading_deg: f64,
    speed_kmh: f64,
    mut turn: impl FnMut() -> f64,
) -> Vec<PathPoint> {
    let step_deg = speed_kmh * f64::from(STEP_HOURS) / KM_PER_DEGREE;
    let (mut lat, mut lon) = (latitude, longitude);
    let mut out = Vec::with_capacity(TRACK_STEPS);
    for step in 0..TRACK_STEPS {
        out.push(PathPoint {
            latitude: round4(lat),
            longitude: round4(lon),
            timestamp: Some(TrackTime::Hours(step as u32 * STEP_HOURS)),
        });
        // heading is clockwise from north
        let rad = heading_deg.to_radians();
        lat += step_deg * rad.cos();
        lon += step_deg * rad.sin();
        heading_deg += turn();
    }
    out
}

/// Straight-line track: twelve points six hours apart.
pub fn straight_track(latitude: f64, longitude: f64, heading_deg: f64, speed_kmh: f64) -> Vec<PathPoint> {
    track(latitude, longitude, heading_deg, speed_kmh, || 0.0)
}

/// Track whose heading wanders up to ±15° per step.
pub fn jittered_track<R: Rng + ?Sized>(
    latitude: f64,
    longitude: f64,
    heading_deg: f64,
    speed_kmh: f64,
    rng: &mut R,
) -> Vec<PathPoint> {
    track(latitude, longitude, heading_deg, speed_kmh, || {
        rng.gen_range(-MAX_TURN_DEG..=MAX_TURN_DEG)
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycloneFeatures {
    pub wind_speed_kmh: f64,
    pub pressure_hpa: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub heading_deg: f64,
    pub speed_kmh: f64,
    pub distance_km: f64,
    pub infrastructure_strength: f64,
    pub population_size: f64,
    pub affected_location_ids: Vec<String>,
}

impl Default for CycloneFeatures {
    fn default() -> Self {
        Self {
            wind_speed_kmh: 50.0,
            pressure_hpa: 1000.0,
            latitude: 15.0,
            longitude: 120.0,
            heading_deg: 270.0,
            speed_kmh: 20.0,
            distance_km: 100.0,
            infrastructure_strength: 5.0,
            population_size: 100_000.0,
            affected_location_ids: Vec::new(),
        }
    }
}

impl CycloneFeatures {
    /// Inputs for a trained classifier: wind, pressure and position.
    pub const LEN: usize = 4;

    pub fn to_array(&self) -> [f64; Self::LEN] {
        [self.wind_speed_kmh, self.pressure_hpa, self.latitude, self.longitude]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycloneForecast {
    pub category: u8,
    pub max_wind_speed_kmh: f64,
    pub central_pressure_hpa: f64,
    pub path_coordinates: Vec<PathPoint>,
    pub affected_locations: Vec<String>,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub risk_color: RiskColor,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct CycloneModel {
    model: Option<LinearModel>,
}

impl CycloneModel {
    pub fn fallback() -> Self {
        Self::default()
    }

    pub fn load(path: Option<&Path>) -> Self {
        Self {
            model: try_load(path, CycloneFeatures::LEN),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    fn category(&self, features: &CycloneFeatures) -> u8 {
        if let Some(model) = &self.model {
            match model.predict(&features.to_array()) {
                Ok(c) if c.is_finite() => return c.round().clamp(0.0, 5.0) as u8,
                Ok(c) => log::warn!("cyclone model produced {c}; using wind speed"),
                Err(e) => log::warn!("{e}; using wind speed"),
            }
        }
        saffir_simpson_category(features.wind_speed_kmh)
    }

    fn forecast(&self, features: &CycloneFeatures, path: Vec<PathPoint>) -> CycloneForecast {
        let category = self.category(features);
        let assessment = assess_cyclone(&CycloneConditions {
            wind_speed_kmh: features.wind_speed_kmh,
            category,
            distance_km: features.distance_km,
            infrastructure_strength: features.infrastructure_strength,
            population_size: features.population_size,
        });
        CycloneForecast {
            category,
            max_wind_speed_kmh: round2(features.wind_speed_kmh),
            central_pressure_hpa: round2(features.pressure_hpa),
            path_coordinates: path,
            affected_locations: features.affected_location_ids.clone(),
            risk_score: assessment.rounded_score(),
            risk_category: assessment.risk_category,
            risk_color: assessment.risk_color,
            confidence_score: if self.is_loaded() {
                LOADED_CONFIDENCE
            } else {
                FALLBACK_CONFIDENCE
            },
        }
    }

    /// Deterministic forecast with a straight track.
    pub fn predict(&self, features: &CycloneFeatures) -> CycloneForecast {
        let path = straight_track(
            features.latitude,
            features.longitude,
            features.heading_deg,
            features.speed_kmh,
        );
        self.forecast(features, path)
    }

    /// Forecast whose track heading wanders, driven by `rng`.
    pub fn predict_jittered<R: Rng + ?Sized>(
        &self,
        features: &CycloneFeatures,
        rng: &mut R,
    ) -> CycloneForecast {
        let path = jittered_track(
            features.latitude,
            features.longitude,
            features.heading_deg,
            features.speed_kmh,
            rng,
        );
        self.forecast(features, path)
    }
}
