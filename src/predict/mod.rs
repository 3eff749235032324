//! Prediction and inference
//!
//! Load the trained classifier, run records through it and resolve labels.

pub mod inference;
pub mod labels;

pub use inference::{MlpClassifier, PriceClassifier, Predictor};
pub use labels::{resolve_label, PriceRange, UNKNOWN_LABEL};
