//! ONNX Runtime backed regressor

use crate::error::ModelError;
use crate::models::regressor::Regressor;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Regression graph exported to ONNX (e.g. by skl2onnx).
///
/// Expects a float input of shape `[1, n_features]` and reads the first
/// element of the output tensor.
pub struct OnnxRegressor {
    name: String,
    /// A run needs exclusive access to the session
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxRegressor {
    /// Load a regression graph from file
    pub fn load<P: AsRef<Path>>(
        path: P,
        onnx_threads: usize,
        input_name: Option<&str>,
        output_name: Option<&str>,
    ) -> Result<Self> {
        let path = path.as_ref();

        info!(path = %path.display(), threads = onnx_threads, "Loading ONNX model");

        ort::init().commit()?;

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = match input_name {
            Some(name) => name.to_string(),
            None => session
                .inputs
                .first()
                .map(|i| i.name.clone())
                .unwrap_or_else(|| "float_input".to_string()),
        };

        let output_name = match output_name {
            Some(name) => name.to_string(),
            None => session
                .outputs
                .iter()
                .find(|o| o.name == "variable" || o.name.contains("output"))
                .or_else(|| session.outputs.first())
                .map(|o| o.name.clone())
                .unwrap_or_else(|| "variable".to_string()),
        };

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(Self {
            name,
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }
}

impl Regressor for OnnxRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    // Shape checks are left to ONNX Runtime
    fn n_features(&self) -> Option<usize> {
        None
    }

    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        let runtime = |e: ort::Error| ModelError::Runtime(e.to_string());

        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, row.len() as i64];
        let data: Vec<f32> = row.iter().map(|&x| x as f32).collect();
        let input_tensor = Tensor::from_array((shape, data)).map_err(runtime)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| ModelError::Runtime(format!("session lock poisoned: {}", e)))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(runtime)?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or(ModelError::EmptyOutput)?;
        let (_, values) = output.try_extract_tensor::<f32>().map_err(runtime)?;
        let prediction = values.first().copied().ok_or(ModelError::EmptyOutput)?;

        debug!(model = %self.name, prediction = prediction, "ONNX inference complete");

        Ok(f64::from(prediction))
    }
}
