//! High-level API for training and using SVM classifiers
//!
//! Two entry points are provided:
//!
//! - [`Svm`], a builder that trains once and hands back an immutable
//!   [`TrainedSvm`];
//! - [`SvmClassifier`], a stateful facade for the classic
//!   train / test / save / load workflow, where calling `predict` before a
//!   successful `train` is an explicit error.
//!
//! # Quick Start
//!
//! ```rust
//! use densvm::api::Svm;
//! use densvm::core::SvmModel;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rows = vec![vec![2.0], vec![-2.0]];
//! let labels = vec![1.0, -1.0];
//!
//! let model = Svm::new().with_c(1.0).train(&rows, &labels)?;
//! let prediction = model.predict(&[1.5])?;
//! assert_eq!(prediction.label, 1.0);
//! # Ok(())
//! # }
//! ```

use crate::core::{Prediction, Result, SvmError, SvmModel, TrainConfig};
use crate::kernel::SvmKernel;
use crate::optimizer::{SvmTrainer, TrainedSvm};
use crate::persistence::SavedModel;
use std::path::Path;

/// Builder-style SVM configuration
pub struct Svm {
    kernel: SvmKernel,
    config: TrainConfig,
}

impl Svm {
    /// Create an SVM with linear kernel and default parameters
    pub fn new() -> Self {
        Self {
            kernel: SvmKernel::default(),
            config: TrainConfig::default(),
        }
    }

    /// Set the kernel
    pub fn with_kernel(mut self, kernel: SvmKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Set regularization parameter C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set maximum number of solver iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the number of kernel rows kept by the row cache
    pub fn with_cache_rows(mut self, cache_rows: usize) -> Self {
        self.config.cache_rows = cache_rows;
        self
    }

    /// Train on feature rows and labels
    pub fn train(self, rows: &[Vec<f64>], labels: &[f64]) -> Result<TrainedSvm> {
        SvmTrainer::new(self.kernel, self.config).train_rows(rows, labels)
    }
}

impl Default for Svm {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateful classifier reproducing the train/test/save/load workflow.
///
/// Wraps an optional trained model: prediction, evaluation, weight access and
/// saving all fail with [`SvmError::ModelNotTrained`] until `train` succeeds
/// or a model is loaded from disk.
pub struct SvmClassifier {
    kernel: SvmKernel,
    config: TrainConfig,
    model: Option<TrainedSvm>,
}

impl SvmClassifier {
    /// Create an untrained classifier with linear kernel and defaults
    pub fn new() -> Self {
        Self {
            kernel: SvmKernel::default(),
            config: TrainConfig::default(),
            model: None,
        }
    }

    /// Create an untrained classifier with an explicit kernel
    pub fn with_kernel(kernel: SvmKernel) -> Self {
        Self {
            kernel,
            config: TrainConfig::default(),
            model: None,
        }
    }

    /// Set regularization parameter C for subsequent training
    pub fn set_c(&mut self, c: f64) {
        self.config.c = c;
    }

    /// Train (or retrain) on feature rows and labels.
    ///
    /// A failed call leaves any previously trained model untouched.
    pub fn train(&mut self, rows: &[Vec<f64>], labels: &[f64]) -> Result<()> {
        let trainer = SvmTrainer::new(self.kernel, self.config.clone());
        let model = trainer.train_rows(rows, labels)?;
        self.model = Some(model);
        Ok(())
    }

    /// Whether a trained model is available
    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Access the trained model
    pub fn model(&self) -> Result<&TrainedSvm> {
        self.model.as_ref().ok_or(SvmError::ModelNotTrained)
    }

    /// Predict a single query vector
    pub fn predict(&self, features: &[f64]) -> Result<Prediction> {
        self.model()?.predict(features)
    }

    /// Predict a batch of query vectors
    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<Prediction>> {
        self.model()?.predict_batch(rows)
    }

    /// Accuracy against known labels; the empty set has no accuracy and is
    /// rejected as a structural error.
    pub fn evaluate(&self, rows: &[Vec<f64>], labels: &[f64]) -> Result<f64> {
        if rows.len() != labels.len() {
            return Err(SvmError::LabelCountMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        if rows.is_empty() {
            return Err(SvmError::EmptyTrainingSet);
        }
        let predictions = self.predict_batch(rows)?;
        let correct = predictions
            .iter()
            .zip(labels.iter())
            .filter(|(pred, &actual)| pred.label == actual)
            .count();
        Ok(correct as f64 / labels.len() as f64)
    }

    /// Explicit weight vector of a trained linear model
    pub fn weights(&self) -> Result<&[f64]> {
        self.model()?
            .weights()
            .ok_or_else(|| SvmError::InvalidParameter("weights require a linear kernel".into()))
    }

    /// Save the trained model to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let model = self.model()?;
        SavedModel::from_model(model, &self.config).save_to_file(path)
    }

    /// Load a previously saved model, replacing any current model.
    ///
    /// The classifier's kernel is updated to the loaded model's kernel.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let saved = SavedModel::load_from_file(path)?;
        let model = saved.to_model()?;
        self.kernel = model.kernel();
        self.model = Some(model);
        Ok(())
    }
}

impl Default for SvmClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Vec<Vec<f64>>, Vec<f64>) {
        let rows = vec![vec![2.0], vec![1.5], vec![-2.0], vec![-1.5]];
        let labels = vec![1.0, 1.0, -1.0, -1.0];
        (rows, labels)
    }

    #[test]
    fn test_builder_pattern() {
        let svm = Svm::new()
            .with_c(2.0)
            .with_tolerance(0.01)
            .with_max_iterations(5000)
            .with_cache_rows(64);

        assert_eq!(svm.config.c, 2.0);
        assert_eq!(svm.config.tolerance, 0.01);
        assert_eq!(svm.config.max_iterations, 5000);
        assert_eq!(svm.config.cache_rows, 64);
    }

    #[test]
    fn test_builder_training() {
        let (rows, labels) = separable();
        let model = Svm::new().train(&rows, &labels).expect("Should train");

        let prediction = model.predict(&[1.0]).expect("Should predict");
        assert_eq!(prediction.label, 1.0);
        assert!(model.n_support_vectors() > 0);
    }

    #[test]
    fn test_predict_before_train_is_error() {
        let classifier = SvmClassifier::new();
        assert!(!classifier.is_trained());

        let result = classifier.predict(&[1.0]);
        assert!(matches!(result, Err(SvmError::ModelNotTrained)));

        let result = classifier.predict_batch(&[vec![1.0]]);
        assert!(matches!(result, Err(SvmError::ModelNotTrained)));

        let result = classifier.weights();
        assert!(matches!(result, Err(SvmError::ModelNotTrained)));
    }

    #[test]
    fn test_save_before_train_is_error() {
        let classifier = SvmClassifier::new();
        let result = classifier.save("nonexistent.densvm");
        assert!(matches!(result, Err(SvmError::ModelNotTrained)));
    }

    #[test]
    fn test_classifier_workflow() {
        let (rows, labels) = separable();
        let mut classifier = SvmClassifier::new();
        classifier.train(&rows, &labels).expect("Should train");

        assert!(classifier.is_trained());
        let accuracy = classifier.evaluate(&rows, &labels).expect("Should evaluate");
        assert_eq!(accuracy, 1.0);

        let w = classifier.weights().expect("Linear model has weights");
        assert!(w[0] > 0.0);
    }

    #[test]
    fn test_failed_retrain_keeps_model() {
        let (rows, labels) = separable();
        let mut classifier = SvmClassifier::new();
        classifier.train(&rows, &labels).expect("Should train");

        // Structural error must not clobber the existing model
        let result = classifier.train(&rows, &[1.0]);
        assert!(result.is_err());
        assert!(classifier.is_trained());
        assert_eq!(
            classifier.evaluate(&rows, &labels).expect("Should evaluate"),
            1.0
        );
    }

    #[test]
    fn test_evaluate_empty_set_is_error() {
        let (rows, labels) = separable();
        let mut classifier = SvmClassifier::new();
        classifier.train(&rows, &labels).expect("Should train");

        // Accuracy over zero points is undefined; must not come back as NaN
        let result = classifier.evaluate(&[], &[]);
        assert!(matches!(result, Err(SvmError::EmptyTrainingSet)));
    }

    #[test]
    fn test_evaluate_count_mismatch() {
        let (rows, labels) = separable();
        let mut classifier = SvmClassifier::new();
        classifier.train(&rows, &labels).expect("Should train");

        let result = classifier.evaluate(&rows, &[1.0]);
        assert!(matches!(result, Err(SvmError::LabelCountMismatch { .. })));
    }

    #[test]
    fn test_rbf_classifier_has_no_weights() {
        let (rows, labels) = separable();
        let mut classifier = SvmClassifier::with_kernel(SvmKernel::rbf(0.5));
        classifier.train(&rows, &labels).expect("Should train");

        let result = classifier.weights();
        assert!(matches!(result, Err(SvmError::InvalidParameter(_))));
    }
}
