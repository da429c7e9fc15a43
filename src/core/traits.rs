//! Core traits for the SVM implementation

use crate::core::{Prediction, Result};

/// Prediction surface of a trained SVM model
pub trait SvmModel: Send + Sync {
    /// Predict a single query vector
    fn predict(&self, features: &[f64]) -> Result<Prediction>;

    /// Predict multiple query vectors with identical per-row semantics
    fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<Prediction>> {
        rows.iter().map(|row| self.predict(row)).collect()
    }

    /// Get the number of support vectors
    fn n_support_vectors(&self) -> usize;

    /// Get the bias term rho
    fn bias(&self) -> f64;
}
