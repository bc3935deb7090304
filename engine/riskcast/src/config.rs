//! `riskcast.toml`
//!
//! Every section and key is optional:
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000"
//!
//! [location]
//! infrastructure_strength = 5.0
//! population_density = 100.0
//!
//! [flooding]
//! drainage_capacity = 5.0
//! base_area_km2 = 50.0
//!
//! [cyclone]
//! distance_km = 100.0
//!
//! [uncertainty]
//! spread = 0.5
//!
//! [models]
//! rainfall = "models/rainfall.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "riskcast.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub location: LocationDefaults,
    pub flooding: FloodingDefaults,
    pub cyclone: CycloneDefaults,
    pub uncertainty: UncertaintyConfig,
    pub models: ModelPaths,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// Site parameters used when a command does not supply them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocationDefaults {
    pub infrastructure_strength: f64,
    pub soil_moisture_retention: f64,
    pub vegetation_density: f64,
    pub population_density: f64,
    pub population_size: f64,
}

impl Default for LocationDefaults {
    fn default() -> Self {
        Self {
            infrastructure_strength: 5.0,
            soil_moisture_retention: 5.0,
            vegetation_density: 5.0,
            population_density: 100.0,
            population_size: 100_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FloodingDefaults {
    pub drainage_capacity: f64,
    pub base_area_km2: f64,
}

impl Default for FloodingDefaults {
    fn default() -> Self {
        Self {
            drainage_capacity: 5.0,
            base_area_km2: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CycloneDefaults {
    pub distance_km: f64,
    pub heading_deg: f64,
    pub speed_kmh: f64,
}

impl Default for CycloneDefaults {
    fn default() -> Self {
        Self {
            distance_km: 100.0,
            heading_deg: 270.0,
            speed_kmh: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UncertaintyConfig {
    pub spread: f64,
}

impl Default for UncertaintyConfig {
    fn default() -> Self {
        Self { spread: 0.5 }
    }
}

/// JSON model files for the prediction wrappers.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelPaths {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rainfall: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flooding: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cyclone: Option<PathBuf>,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load an explicit file, or `riskcast.toml` when present, or defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::load(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
