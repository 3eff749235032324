//! Model inference for predictions

use std::path::Path;

use burn::module::Module;
use burn::tensor::activation::softmax;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::features::{FeatureRecord, RawInput};
use crate::model::{PriceNet, PriceNetConfig};
use crate::predict::labels::resolve_label;
use crate::{PriceError, PricePrediction, Result};

/// A trained classifier mapping a feature record to a price range index
pub trait PriceClassifier {
    /// Predicted class index; expected in 0..4 but not guaranteed
    fn predict_class(&self, record: &FeatureRecord) -> Result<i64>;

    /// Class index plus per-class probabilities when the model has them
    fn classify(&self, record: &FeatureRecord) -> Result<(i64, Option<Vec<f32>>)> {
        Ok((self.predict_class(record)?, None))
    }
}

/// Classifier backed by a burn `PriceNet`
pub struct MlpClassifier<B: Backend> {
    model: PriceNet<B>,
    config: PriceNetConfig,
    device: B::Device,
}

impl<B: Backend> MlpClassifier<B>
where
    B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
    B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
{
    pub fn new(model: PriceNet<B>, config: PriceNetConfig, device: B::Device) -> Self {
        MlpClassifier {
            model,
            config,
            device,
        }
    }

    /// Load the classifier artifact (`<artifact_path>.mpk`)
    pub fn load(device: B::Device, artifact_path: &str, config: PriceNetConfig) -> Result<Self> {
        let model_file = format!("{}.mpk", artifact_path);
        if !Path::new(&model_file).exists() {
            return Err(PriceError::NoModel { path: model_file });
        }

        let model = PriceNet::load(&device, artifact_path, &config)?;
        log::info!(
            "Loaded model from {} ({} hidden layers, {} parameters)",
            model_file,
            model.depth(),
            model.num_params()
        );
        Ok(Self::new(model, config, device))
    }

    pub fn config(&self) -> &PriceNetConfig {
        &self.config
    }

    pub fn model(&self) -> &PriceNet<B> {
        &self.model
    }

    /// Softmax over the class logits for one record
    pub fn probabilities(&self, record: &FeatureRecord) -> Result<Vec<f32>> {
        let scaled = record.scaled();
        let input = Tensor::<B, 1>::from_floats(scaled.as_slice(), &self.device)
            .reshape([1, FeatureRecord::DIM]);

        let probs = softmax(self.model.forward(input), 1);
        probs
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| PriceError::Inference(format!("{:?}", e)))
    }
}

impl<B: Backend> PriceClassifier for MlpClassifier<B>
where
    B::FloatElem: serde::Serialize + serde::de::DeserializeOwned,
    B::IntElem: serde::Serialize + serde::de::DeserializeOwned,
{
    fn predict_class(&self, record: &FeatureRecord) -> Result<i64> {
        self.classify(record).map(|(class, _)| class)
    }

    fn classify(&self, record: &FeatureRecord) -> Result<(i64, Option<Vec<f32>>)> {
        let probs = self.probabilities(record)?;
        let class = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i as i64)
            .ok_or_else(|| PriceError::Inference("model produced no class scores".to_string()))?;
        Ok((class, Some(probs)))
    }
}

/// Runs collected input through assembly, classification and labelling
pub struct Predictor<C: PriceClassifier> {
    classifier: C,
}

impl<C: PriceClassifier> Predictor<C> {
    pub fn new(classifier: C) -> Self {
        Predictor { classifier }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Predict the price range for one phone
    pub fn predict(&self, input: &RawInput) -> Result<PricePrediction> {
        let record = FeatureRecord::assemble(input);
        log::debug!("Assembled record: {:?}", record.values());

        let (class_index, probabilities) = self.classifier.classify(&record)?;
        let label = resolve_label(class_index);
        log::info!("Predicted class {} ({})", class_index, label);

        Ok(PricePrediction {
            class_index,
            label,
            probabilities,
            record,
        })
    }

    /// Predict several phones; a failure only affects its own entry
    pub fn predict_batch(&self, inputs: &[RawInput]) -> Vec<Result<PricePrediction>> {
        inputs.iter().map(|input| self.predict(input)).collect()
    }
}

/// Format a prediction for display
pub fn format_prediction(pred: &PricePrediction) -> String {
    let confidence = pred
        .confidence()
        .map(|p| format!("{:.1}%", p * 100.0))
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        r#"
┌─────────────────────────────────────────────────┐
│  Predicted Price Range: {}
├─────────────────────────────────────────────────┤
│  Class index:  {}
│  Confidence:   {}
└─────────────────────────────────────────────────┘
"#,
        pred.label, pred.class_index, confidence
    )
}
