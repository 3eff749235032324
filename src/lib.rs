//! Mobile phone price range classification
//!
//! Collects twenty hardware attributes, assembles them into a fixed-schema
//! feature record and maps the classifier's output to a price-range label.

pub mod features;
pub mod model;
pub mod predict;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use features::{Feature, FeatureRecord, RawInput, RawValue, YesNo};
pub use predict::{resolve_label, PriceRange, Predictor};

/// Result of a single prediction request
#[derive(Debug, Clone, Serialize)]
pub struct PricePrediction {
    /// Raw class index returned by the classifier
    pub class_index: i64,
    /// Display label ("Unknown" when the index is outside the known ranges)
    pub label: &'static str,
    /// Per-class probabilities, when the classifier exposes them
    pub probabilities: Option<Vec<f32>>,
    /// The record that was fed to the classifier
    pub record: FeatureRecord,
}

impl PricePrediction {
    /// The resolved price range, if the index is a known one
    pub fn price_range(&self) -> Option<PriceRange> {
        PriceRange::from_index(self.class_index)
    }

    /// Probability assigned to the predicted class
    pub fn confidence(&self) -> Option<f32> {
        let probs = self.probabilities.as_ref()?;
        usize::try_from(self.class_index)
            .ok()
            .and_then(|i| probs.get(i).copied())
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("Model artifact not found at {path} - place a trained model there or set model.artifact_path")]
    NoModel { path: String },

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Prediction failed: {0}")]
    Inference(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Missing value for feature: {0}")]
    MissingFeature(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PriceError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path of the model record, without the `.mpk` extension burn appends
    pub artifact_path: String,
    pub hidden_dims: Vec<usize>,
    pub dropout: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub image_path: String,
    pub image_caption: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            model: ModelConfig {
                artifact_path: "model/price_model".to_string(),
                hidden_dims: vec![64, 32],
                dropout: 0.1,
            },
            display: DisplayConfig {
                image_path: "data/images/phone1_image.jpg".to_string(),
                image_caption: "Image source: Google".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PriceError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| PriceError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PriceError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Model file as written by burn's MessagePack recorder
    pub fn model_file(&self) -> String {
        format!("{}.mpk", self.model.artifact_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.model.artifact_path, "model/price_model");
        assert_eq!(parsed.model.hidden_dims, vec![64, 32]);
        assert_eq!(parsed.display.image_caption, "Image source: Google");
    }

    #[test]
    fn test_model_file_appends_mpk() {
        let config = Config::default();
        assert_eq!(config.model_file(), "model/price_model.mpk");
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let err = Config::load("/nonexistent/phone-price/config.toml").unwrap_err();
        assert!(matches!(err, PriceError::Config(_)));
    }

    #[test]
    fn test_confidence_reads_predicted_class() {
        let prediction = PricePrediction {
            class_index: 2,
            label: "High Cost",
            probabilities: Some(vec![0.1, 0.2, 0.6, 0.1]),
            record: FeatureRecord::from_values([0.0; features::FEATURE_COUNT]),
        };
        assert_eq!(prediction.confidence(), Some(0.6));
        assert_eq!(prediction.price_range(), Some(PriceRange::High));

        let unknown = PricePrediction {
            class_index: 99,
            ..prediction
        };
        assert_eq!(unknown.confidence(), None);
        assert_eq!(unknown.price_range(), None);
    }
}
