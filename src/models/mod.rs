//! Model artifact, encoders and inference

pub mod encoder;
pub mod inference;
pub mod loader;
pub mod onnx;
pub mod regressor;
pub mod tree;

pub use encoder::{CategoricalFeature, EncoderSet, LabelEncoder};
pub use inference::{PricePrediction, PricePredictor};
pub use loader::{ArtifactLoader, ArtifactManifest, LoadedArtifact};
pub use regressor::{LinearRegressor, Regressor};
pub use tree::TreeEnsemble;
