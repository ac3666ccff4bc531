//! Model artifact loader

use crate::feature_extractor::FeatureExtractor;
use crate::models::encoder::EncoderSet;
use crate::models::onnx::OnnxRegressor;
use crate::models::regressor::{LinearRegressor, Regressor};
use crate::models::tree::TreeEnsemble;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// Vocabulary of one label encoder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderSpec {
    #[serde(alias = "classes_")]
    pub classes: Vec<String>,
}

/// Model stored in the artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    /// ONNX graph next to the manifest
    Onnx {
        path: PathBuf,
        #[serde(default)]
        input_name: Option<String>,
        #[serde(default)]
        output_name: Option<String>,
    },
    Linear(LinearRegressor),
    TreeEnsemble(TreeEnsemble),
}

/// On-disk artifact manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub model: ModelSpec,
    pub label_encoders: HashMap<String, EncoderSpec>,
    pub feature_columns: Vec<String>,
}

/// Everything the predictor needs, loaded once at startup
pub struct LoadedArtifact {
    pub regressor: Box<dyn Regressor>,
    pub encoders: EncoderSet,
    pub extractor: FeatureExtractor,
}

/// Loader for model artifacts
pub struct ArtifactLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ArtifactLoader {
    /// Create a new loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new loader with the given number of ONNX threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Read and build an artifact from its manifest file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadedArtifact> {
        let path = path.as_ref();

        info!(path = %path.display(), "Loading model artifact");

        let file = File::open(path)
            .with_context(|| format!("Failed to open artifact {}", path.display()))?;
        let manifest: ArtifactManifest = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse artifact {}", path.display()))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        self.build(manifest, base_dir)
    }

    /// Build an artifact from an already parsed manifest.
    ///
    /// Relative ONNX paths resolve against `base_dir`.
    pub fn build(&self, manifest: ArtifactManifest, base_dir: &Path) -> Result<LoadedArtifact> {
        let extractor = FeatureExtractor::new(manifest.feature_columns.as_slice())
            .context("Invalid feature_columns in artifact")?;

        let vocabularies = manifest
            .label_encoders
            .into_iter()
            .map(|(feature, spec)| (feature, spec.classes))
            .collect();
        let encoders = EncoderSet::from_vocabularies(vocabularies)?;

        let regressor: Box<dyn Regressor> = match manifest.model {
            ModelSpec::Onnx {
                path,
                input_name,
                output_name,
            } => Box::new(OnnxRegressor::load(
                base_dir.join(path),
                self.onnx_threads,
                input_name.as_deref(),
                output_name.as_deref(),
            )?),
            ModelSpec::Linear(model) => Box::new(model),
            ModelSpec::TreeEnsemble(model) => {
                model.validate().context("Invalid tree ensemble in artifact")?;
                Box::new(model)
            }
        };

        info!(
            model = %regressor.name(),
            features = ?extractor.feature_names(),
            "Model artifact loaded"
        );

        Ok(LoadedArtifact {
            regressor,
            encoders,
            extractor,
        })
    }
}

impl Default for ArtifactLoader {
    fn default() -> Self {
        Self::new()
    }
}
