//! ONNX-backed classifier handles.
//!
//! Models are opaque pre-trained artifacts consumed only through a
//! predict(tensor) -> probability vector contract. They are loaded once at
//! startup; a load failure aborts the process.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::error::InferenceError;

/// Uniform prediction contract for a loaded classification model.
///
/// The output is the model's raw probability vector: 4 class probabilities
/// for the tumor model, a single scalar for the pneumonia model.
pub trait ImageClassifier: Send + Sync {
    fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

/// Wraps an ONNX Runtime session for one classification model.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    /// Name of the input tensor (detected from model metadata).
    input_name: String,
}

impl OnnxClassifier {
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        let session = Session::builder()
            .map_err(|e| {
                InferenceError::Model(format!("failed to create ONNX session builder: {e}"))
            })?
            .commit_from_file(model_path)
            .map_err(|e| {
                InferenceError::Model(format!(
                    "failed to load ONNX model from {}: {e}",
                    model_path.display()
                ))
            })?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .ok_or_else(|| InferenceError::Model("model declares no inputs".to_string()))?;

        log::debug!(
            "Loaded ONNX model from {} (input: {:?})",
            model_path.display(),
            input_name
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }
}

impl ImageClassifier for OnnxClassifier {
    fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        // Convert ndarray to (shape, flat_data) for ort.
        let shape: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = input.iter().copied().collect();

        let input_value = Value::from_array((shape, flat_data))
            .map_err(|e| InferenceError::Model(format!("failed to create input tensor: {e}")))?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];

        let mut session = self
            .session
            .lock()
            .map_err(|e| InferenceError::Model(format!("session lock poisoned: {e}")))?;

        let outputs = session
            .run(inputs)
            .map_err(|e| InferenceError::Model(format!("ONNX inference failed: {e}")))?;

        // The classifier head is the model's single (first) output.
        let output = outputs
            .iter()
            .next()
            .ok_or_else(|| InferenceError::Model("model produced no outputs".to_string()))?;

        let (_shape, data) = output
            .1
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Model(format!("failed to extract output tensor: {e}")))?;

        if data.is_empty() {
            return Err(InferenceError::EmptyOutput);
        }
        Ok(data.to_vec())
    }
}
