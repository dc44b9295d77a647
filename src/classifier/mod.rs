//! Chest X-ray classifier adapter.
//!
//! Wraps a pretrained two-class network (ResNet-18 backbone, Normal vs.
//! Pneumonia head) behind the [`XrayModel`] trait. The adapter owns
//! preprocessing and the softmax/argmax step; backends only map an input
//! tensor to two logits.
//!
//! Failure classes:
//! - initialisation ([`ClassifierError::is_fatal`]): the model cannot be
//!   served at all for this process,
//! - per-request: the uploaded image could not be decoded.

pub mod preprocess;
pub mod weights;

#[cfg(feature = "onnx")]
mod onnx;

#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;

use std::path::PathBuf;

use ndarray::Array4;
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::ImagePrediction;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Classifier weights not found: {0}")]
    WeightsMissing(PathBuf),

    #[error("Weights download failed: {0}")]
    Download(String),

    #[error("Weights checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Classifier initialization: {0}")]
    ModelInit(String),

    #[error("Unexpected model output shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("No inference backend compiled in (enable the `onnx` feature)")]
    BackendUnavailable,

    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    #[error("Image could not be read: {0}")]
    ImageDecode(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl ClassifierError {
    /// Whether this error disables the classifier for the whole process.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::ImageDecode(_) | Self::Inference(_))
    }
}

/// Inference backend: one forward pass from an NCHW `[1, 3, 224, 224]`
/// tensor to the `[normal, pneumonia]` logits.
pub trait XrayModel: Send + Sync {
    fn logits(&self, input: &Array4<f32>) -> Result<[f32; 2], ClassifierError>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}

/// Preprocessing + model + decision rule.
pub struct XrayClassifier {
    model: Box<dyn XrayModel>,
}

impl XrayClassifier {
    pub fn new(model: Box<dyn XrayModel>) -> Self {
        Self { model }
    }

    pub fn backend(&self) -> &'static str {
        self.model.backend()
    }

    /// Classify an encoded JPEG/PNG image.
    pub fn predict(&self, image_bytes: &[u8]) -> Result<ImagePrediction, ClassifierError> {
        let input = preprocess::preprocess(image_bytes)?;
        self.predict_tensor(&input)
    }

    /// Classify an already preprocessed tensor.
    pub fn predict_tensor(&self, input: &Array4<f32>) -> Result<ImagePrediction, ClassifierError> {
        let logits = self.model.logits(input)?;
        if logits.iter().any(|l| !l.is_finite()) {
            return Err(ClassifierError::Inference(format!(
                "non-finite logits {logits:?}"
            )));
        }
        let prediction = ImagePrediction::from_logits(logits);
        tracing::debug!(
            label = %prediction.label,
            confidence = prediction.confidence,
            "X-ray classified"
        );
        Ok(prediction)
    }
}

/// Resolve the weights (downloading them if absent) and load the backend.
pub fn load_from_config(config: &AppConfig) -> Result<XrayClassifier, ClassifierError> {
    let source = weights::WeightsSource::from_config(config);
    let path = weights::ensure_weights(&source)?;
    load_model(&path)
}

#[cfg(feature = "onnx")]
fn load_model(path: &std::path::Path) -> Result<XrayClassifier, ClassifierError> {
    let model = OnnxModel::load(path)?;
    Ok(XrayClassifier::new(Box::new(model)))
}

#[cfg(not(feature = "onnx"))]
fn load_model(path: &std::path::Path) -> Result<XrayClassifier, ClassifierError> {
    tracing::warn!(
        path = %path.display(),
        "Weights present but no inference backend compiled in"
    );
    Err(ClassifierError::BackendUnavailable)
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::models::XrayLabel;
    use std::sync::atomic::Ordering;

    #[test]
    fn predict_runs_one_forward_pass() {
        let model = FixedLogitsModel::new([0.2, 2.2]);
        let calls = model.calls.clone();
        let classifier = XrayClassifier::new(Box::new(model));

        let prediction = classifier.predict(&sample_png()).unwrap();
        assert_eq!(prediction.label, XrayLabel::Pneumonia);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unreadable_image_is_per_request_error() {
        let model = FixedLogitsModel::new([1.0, 0.0]);
        let calls = model.calls.clone();
        let classifier = XrayClassifier::new(Box::new(model));

        let err = classifier.predict(b"\x89PNG garbage").unwrap_err();
        assert!(matches!(err, ClassifierError::ImageDecode(_)));
        assert!(!err.is_fatal());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn non_finite_logits_are_rejected() {
        let classifier = classifier([f32::NAN, 0.0]);
        let err = classifier.predict(&sample_png()).unwrap_err();
        assert!(matches!(err, ClassifierError::Inference(_)));
    }

    #[test]
    fn init_errors_are_fatal() {
        assert!(ClassifierError::WeightsMissing(PathBuf::from("x")).is_fatal());
        assert!(ClassifierError::BackendUnavailable.is_fatal());
        assert!(ClassifierError::ShapeMismatch {
            expected: vec![1, 2],
            actual: vec![1, 1000]
        }
        .is_fatal());
    }

    #[test]
    fn load_without_weights_or_url_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig {
            model_path: tmp.path().join("missing.onnx"),
            model_url: None,
            ..AppConfig::default()
        };
        let err = load_from_config(&config).err().unwrap();
        assert!(matches!(err, ClassifierError::WeightsMissing(_)));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn load_without_backend_reports_unavailable() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model.onnx");
        std::fs::write(&path, b"weights").unwrap();
        let config = AppConfig {
            model_path: path,
            ..AppConfig::default()
        };
        let err = load_from_config(&config).err().unwrap();
        assert!(matches!(err, ClassifierError::BackendUnavailable));
    }

    #[cfg(feature = "onnx")]
    #[test]
    fn corrupt_weights_fail_to_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model.onnx");
        std::fs::write(&path, b"this is not an onnx graph").unwrap();
        let config = AppConfig {
            model_path: path,
            ..AppConfig::default()
        };
        let err = load_from_config(&config).err().unwrap();
        assert!(matches!(err, ClassifierError::ModelInit(_)));
    }
}
