//! Model serialization and persistence
//!
//! A trained model is dumped as a single versioned JSON record holding the
//! kernel, bias, support vectors and their coefficients, plus metadata about
//! the training run. Loading validates the format version before any model
//! is constructed, so a corrupt or mismatched file never yields a
//! partially-initialized model.

use crate::core::{Result, SvmError, SvmModel, TrainConfig};
use crate::kernel::SvmKernel;
use crate::optimizer::TrainedSvm;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

/// Serializable representation of a trained SVM model
#[derive(Serialize, Deserialize)]
pub struct SavedModel {
    /// On-disk format version; must equal [`FORMAT_VERSION`] to load
    pub format_version: u32,
    /// Kernel type and parameters
    pub kernel: SvmKernel,
    /// Bias term rho
    pub rho: f64,
    /// Coefficients alpha_i * y_i, one per support vector
    pub coefficients: Vec<f64>,
    /// Dense support vector rows
    pub support_vectors: Vec<Vec<f64>>,
    /// Whether the solver converged within tolerance
    pub converged: bool,
    /// Solver iterations performed
    pub iterations: usize,
    /// Model metadata
    pub metadata: ModelMetadata,
}

/// Model metadata for tracking and validation
#[derive(Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Number of support vectors
    pub n_support_vectors: usize,
    /// Training parameters used
    pub training_params: TrainingParams,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

/// Training parameters recorded for reference
#[derive(Serialize, Deserialize)]
pub struct TrainingParams {
    pub c: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl SavedModel {
    /// Create a serializable record from a trained model
    pub fn from_model(model: &TrainedSvm, config: &TrainConfig) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            kernel: model.kernel(),
            rho: model.bias(),
            coefficients: model.coefficients().to_vec(),
            support_vectors: model.support_vectors().to_vec(),
            converged: model.converged(),
            iterations: model.iterations(),
            metadata: ModelMetadata {
                library_version: crate::VERSION.to_string(),
                n_support_vectors: model.support_vectors().len(),
                training_params: TrainingParams {
                    c: config.c,
                    tolerance: config.tolerance,
                    max_iterations: config.max_iterations,
                },
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Save the record to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(|e| SvmError::Format(e.to_string()))?;
        Ok(())
    }

    /// Load a record from a file, validating the format version
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let saved: SavedModel =
            serde_json::from_reader(reader).map_err(|e| SvmError::Format(e.to_string()))?;

        if saved.format_version != FORMAT_VERSION {
            return Err(SvmError::Format(format!(
                "unsupported format version {} (expected {})",
                saved.format_version, FORMAT_VERSION
            )));
        }
        Ok(saved)
    }

    /// Reconstruct a usable model from the record
    pub fn to_model(&self) -> Result<TrainedSvm> {
        TrainedSvm::from_parts(
            self.kernel,
            self.support_vectors.clone(),
            self.coefficients.clone(),
            self.rho,
            self.converged,
            self.iterations,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Svm;
    use crate::core::SvmModel;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn trained_model() -> TrainedSvm {
        let rows = vec![vec![2.0, 0.5], vec![1.5, 0.4], vec![-2.0, -0.5], vec![-1.5, -0.4]];
        let labels = vec![1.0, 1.0, -1.0, -1.0];
        Svm::new().train(&rows, &labels).expect("Should train")
    }

    #[test]
    fn test_round_trip_preserves_predictions() {
        let model = trained_model();
        let saved = SavedModel::from_model(&model, &TrainConfig::default());

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        saved.save_to_file(temp_file.path()).expect("Should save");

        let loaded = SavedModel::load_from_file(temp_file.path()).expect("Should load");
        let restored = loaded.to_model().expect("Should rebuild");

        assert_eq!(restored.bias(), model.bias());
        assert_eq!(restored.n_support_vectors(), model.n_support_vectors());
        assert_eq!(restored.coefficients(), model.coefficients());
        assert_eq!(restored.converged(), model.converged());

        // Predictions must match exactly for arbitrary queries
        for query in [[0.7, 0.1], [-0.3, 0.9], [1.2, -2.0]] {
            let original = model.predict(&query).expect("Should predict");
            let reloaded = restored.predict(&query).expect("Should predict");
            assert_eq!(original, reloaded);
        }
    }

    #[test]
    fn test_rbf_round_trip() {
        let rows = vec![vec![1.0], vec![-1.0]];
        let labels = vec![1.0, -1.0];
        let model = Svm::new()
            .with_kernel(SvmKernel::rbf(0.7))
            .train(&rows, &labels)
            .expect("Should train");

        let saved = SavedModel::from_model(&model, &TrainConfig::default());
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        saved.save_to_file(temp_file.path()).expect("Should save");

        let restored = SavedModel::load_from_file(temp_file.path())
            .expect("Should load")
            .to_model()
            .expect("Should rebuild");

        assert_eq!(restored.kernel(), SvmKernel::rbf(0.7));
        assert!(restored.weights().is_none());
        let original = model.predict(&[0.4]).expect("Should predict");
        let reloaded = restored.predict(&[0.4]).expect("Should predict");
        assert_eq!(original, reloaded);
    }

    #[test]
    fn test_awkward_floats_survive_save_load_exactly() {
        // Coefficients rarely have short decimal expansions; the persisted
        // record must give back bit-identical f64 values, not 1-ULP
        // neighbours.
        let mut saved = SavedModel::from_model(&trained_model(), &TrainConfig::default());
        saved.coefficients = vec![0.207_468_879_668_049_75, 0.1 + 0.2, 1.0 / 3.0];
        saved.rho = -3.107_218_449_131_482_3e-2;

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        saved.save_to_file(temp_file.path()).expect("Should save");
        let loaded = SavedModel::load_from_file(temp_file.path()).expect("Should load");

        for (before, after) in saved.coefficients.iter().zip(loaded.coefficients.iter()) {
            assert_eq!(before.to_bits(), after.to_bits());
        }
        assert_eq!(saved.rho.to_bits(), loaded.rho.to_bits());
    }

    #[test]
    fn test_corrupt_file_is_format_error() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "this is not a model").expect("Failed to write");
        temp_file.flush().expect("Failed to flush");

        let result = SavedModel::load_from_file(temp_file.path());
        assert!(matches!(result, Err(SvmError::Format(_))));
    }

    #[test]
    fn test_version_mismatch_is_format_error() {
        let model = trained_model();
        let mut saved = SavedModel::from_model(&model, &TrainConfig::default());
        saved.format_version = 99;

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        saved.save_to_file(temp_file.path()).expect("Should save");

        let result = SavedModel::load_from_file(temp_file.path());
        assert!(matches!(result, Err(SvmError::Format(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SavedModel::load_from_file("/nonexistent/path/model.densvm");
        assert!(matches!(result, Err(SvmError::Io(_))));
    }

    #[test]
    fn test_inconsistent_record_rejected() {
        let model = trained_model();
        let mut saved = SavedModel::from_model(&model, &TrainConfig::default());
        saved.coefficients.pop();

        let result = saved.to_model();
        assert!(matches!(result, Err(SvmError::Format(_))));
    }
}
