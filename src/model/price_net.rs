//! Feed-forward price range classifier
//!
//! Architecture: Input(20) → [Linear → ReLU → Dropout] × n → Linear(4)
//!
//! Inputs are the min-max scaled feature record; outputs are one logit per
//! price range.

use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig};
use burn::record::{FullPrecisionSettings, Recorder};
use burn::tensor::activation::relu;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::features::FeatureRecord;
use crate::predict::PriceRange;
use crate::{ModelConfig, PriceError};

/// Configuration for the classifier network
#[derive(Debug, Clone)]
pub struct PriceNetConfig {
    /// Input dimension (feature record width)
    pub input_dim: usize,
    /// Hidden layer dimensions, e.g. [64, 32] for two layers
    pub hidden_dims: Vec<usize>,
    /// Number of output classes
    pub num_classes: usize,
    pub dropout: f64,
}

impl Default for PriceNetConfig {
    fn default() -> Self {
        PriceNetConfig {
            input_dim: FeatureRecord::DIM,
            hidden_dims: vec![64, 32],
            num_classes: PriceRange::COUNT,
            dropout: 0.1,
        }
    }
}

impl PriceNetConfig {
    pub fn from_model_config(config: &ModelConfig) -> Self {
        PriceNetConfig {
            hidden_dims: config.hidden_dims.clone(),
            dropout: config.dropout,
            ..Default::default()
        }
    }
}

/// A single hidden layer block: Linear → ReLU → Dropout
#[derive(Module, Debug)]
pub struct HiddenBlock<B: Backend> {
    linear: Linear<B>,
    dropout: Dropout,
}

impl<B: Backend> HiddenBlock<B> {
    pub fn new(device: &B::Device, in_dim: usize, out_dim: usize, dropout: f64) -> Self {
        HiddenBlock {
            linear: LinearConfig::new(in_dim, out_dim).init(device),
            dropout: DropoutConfig::new(dropout).init(),
        }
    }

    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.linear.forward(x);
        let x = relu(x);
        self.dropout.forward(x)
    }
}

/// Multi-layer perceptron producing one logit per price range
#[derive(Module, Debug)]
pub struct PriceNet<B: Backend> {
    hidden: Vec<HiddenBlock<B>>,
    head: Linear<B>,
}

impl<B: Backend> PriceNet<B> {
    /// Create a new, untrained network
    pub fn new(device: &B::Device, config: &PriceNetConfig) -> Self {
        let mut hidden = Vec::with_capacity(config.hidden_dims.len());
        let mut in_dim = config.input_dim;
        for &out_dim in &config.hidden_dims {
            hidden.push(HiddenBlock::new(device, in_dim, out_dim, config.dropout));
            in_dim = out_dim;
        }

        PriceNet {
            hidden,
            head: LinearConfig::new(in_dim, config.num_classes).init(device),
        }
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `features` - Scaled feature records [batch, input_dim]
    ///
    /// # Returns
    /// Class logits [batch, num_classes]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self
            .hidden
            .iter()
            .fold(features, |x, block| block.forward(x));
        self.head.forward(x)
    }

    /// Number of hidden blocks
    pub fn depth(&self) -> usize {
        self.hidden.len()
    }

    /// Save model to file
    pub fn save(&self, path: &str) -> crate::Result<()>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = burn::record::NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        recorder
            .record(self.clone().into_record(), path.into())
            .map_err(|e| PriceError::Io(std::io::Error::other(e.to_string())))
    }

    /// Load model from file
    pub fn load(device: &B::Device, path: &str, config: &PriceNetConfig) -> crate::Result<Self>
    where
        B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
        B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
    {
        let recorder = burn::record::NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let record: PriceNetRecord<B> = recorder
            .load(path.into(), device)
            .map_err(|e| PriceError::ModelLoad(format!("{}: {}", path, e)))?;
        check_record(&record, config)
            .map_err(|e| PriceError::ModelLoad(format!("{}: {}", path, e)))?;

        let model = Self::new(device, config);
        Ok(model.load_record(record))
    }
}

/// Layer shapes `[in, out]` a config expects, hidden blocks first, head last
fn expected_shapes(config: &PriceNetConfig) -> Vec<[usize; 2]> {
    let mut shapes = Vec::with_capacity(config.hidden_dims.len() + 1);
    let mut in_dim = config.input_dim;
    for &out_dim in &config.hidden_dims {
        shapes.push([in_dim, out_dim]);
        in_dim = out_dim;
    }
    shapes.push([in_dim, config.num_classes]);
    shapes
}

/// A saved record must match the configured architecture before it is loaded
fn check_record<B: Backend>(
    record: &PriceNetRecord<B>,
    config: &PriceNetConfig,
) -> std::result::Result<(), String> {
    if record.hidden.len() != config.hidden_dims.len() {
        return Err(format!(
            "artifact has {} hidden layers, config expects {}",
            record.hidden.len(),
            config.hidden_dims.len()
        ));
    }

    let found = record
        .hidden
        .iter()
        .map(|block| block.linear.weight.val().dims())
        .chain(std::iter::once(record.head.weight.val().dims()));

    for (layer, (found, expected)) in found.zip(expected_shapes(config)).enumerate() {
        if found != expected {
            return Err(format!(
                "layer {} has shape {:?}, config expects {:?}",
                layer, found, expected
            ));
        }
    }
    Ok(())
}
