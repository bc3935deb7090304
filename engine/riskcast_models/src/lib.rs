//! Prediction wrappers for rainfall, flooding and cyclones.
//!
//! Each wrapper optionally loads a [`LinearModel`] from JSON. Loading is
//! best-effort: without a usable model the wrappers fall back to
//! deterministic rules and report a lower confidence.

pub mod cyclone;
pub mod error;
pub mod flooding;
pub mod linear;
pub mod rainfall;

pub use cyclone::{
    jittered_track, saffir_simpson_category, straight_track, CycloneFeatures, CycloneForecast,
    CycloneModel,
};
pub use error::ModelError;
pub use flooding::{FloodingFeatures, FloodingForecast, FloodingModel};
pub use linear::{LinearModel, Model};
pub use rainfall::{
    fallback_rainfall_mm, features_from_observation, RainfallFeatures, RainfallForecast,
    RainfallModel,
};
