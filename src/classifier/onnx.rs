use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;

use super::preprocess::INPUT_SIZE;
use super::{ClassifierError, XrayModel};

const EXPECTED_OUTPUT: [usize; 2] = [1, 2];

/// ResNet-18 two-class classifier executed with ONNX Runtime.
///
/// Uses interior mutability (Mutex) because `ort::Session::run` requires
/// `&mut self` while the classifier is shared read-only across requests.
pub struct OnnxModel {
    session: Mutex<Session>,
}

impl OnnxModel {
    /// Load an exported graph and verify it produces `[1, 2]` logits for a
    /// `[1, 3, 224, 224]` input. A checkpoint for another architecture fails
    /// here rather than on the first request.
    pub fn load(model_path: &Path) -> Result<Self, ClassifierError> {
        if !model_path.exists() {
            return Err(ClassifierError::WeightsMissing(model_path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e: ort::Error| ClassifierError::ModelInit(e.to_string()))?
            .with_intra_threads(2)
            .map_err(|e: ort::Error| ClassifierError::ModelInit(e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e: ort::Error| ClassifierError::ModelInit(format!("ONNX load failed: {e}")))?;

        let model = Self {
            session: Mutex::new(session),
        };

        let side = INPUT_SIZE as usize;
        let probe = Array4::<f32>::zeros((1, 3, side, side));
        model.run(&probe).map_err(|e| match e {
            ClassifierError::Inference(msg) => {
                ClassifierError::ModelInit(format!("Probe inference failed: {msg}"))
            }
            other => other,
        })?;

        tracing::info!("ONNX X-ray classifier loaded from {}", model_path.display());
        Ok(model)
    }

    fn run(&self, input: &Array4<f32>) -> Result<[f32; 2], ClassifierError> {
        let tensor = TensorRef::from_array_view(input)
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifierError::Inference("Session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| ClassifierError::Inference(format!("ONNX inference failed: {e}")))?;

        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::Inference(format!("Output extraction: {e}")))?;

        let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
        if dims != EXPECTED_OUTPUT || data.len() != 2 {
            return Err(ClassifierError::ShapeMismatch {
                expected: EXPECTED_OUTPUT.to_vec(),
                actual: dims,
            });
        }

        Ok([data[0], data[1]])
    }
}

impl XrayModel for OnnxModel {
    fn logits(&self, input: &Array4<f32>) -> Result<[f32; 2], ClassifierError> {
        self.run(input)
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }
}
