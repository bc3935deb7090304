use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Minimal trait for prediction models
pub trait Model {
    fn name(&self) -> &str;
}

/// Weighted sum of features plus a bias, persisted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    pub bias: f64,
    pub model_name: String,
}

impl Model for LinearModel {
    fn name(&self) -> &str {
        &self.model_name
    }
}

impl LinearModel {
    pub fn new(model_name: impl Into<String>, weights: Vec<f64>, bias: f64) -> Self {
        Self {
            weights,
            bias,
            model_name: model_name.into(),
        }
    }

    pub fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.weights.len() {
            return Err(ModelError::Shape {
                model: self.model_name.clone(),
                expected: self.weights.len(),
                found: features.len(),
            });
        }
        let s = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>();
        Ok(s + self.bias)
    }

    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Require exactly `n` weights.
    pub(crate) fn expect_features(self, n: usize) -> Result<Self, ModelError> {
        if self.weights.len() == n {
            Ok(self)
        } else {
            Err(ModelError::Shape {
                model: self.model_name,
                expected: n,
                found: self.weights.len(),
            })
        }
    }
}

/// Best-effort load used by the wrappers: a missing or broken file means
/// "no model", logged at warn.
pub(crate) fn try_load(path: Option<&Path>, features: usize) -> Option<LinearModel> {
    let path = path?;
    match LinearModel::load(path).and_then(|m| m.expect_features(features)) {
        Ok(m) => {
            log::info!("loaded model '{}' from {}", m.model_name, path.display());
            Some(m)
        }
        Err(e) => {
            log::warn!("{e}; using fallback predictions");
            None
        }
    }
}
