//! Core type definitions for the SVM core

use crate::core::{Result, SvmError};

/// Prediction result containing label and decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class label (+1 or -1)
    pub label: f64,
    /// Raw decision function value (signed margin)
    pub decision_value: f64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(label: f64, decision_value: f64) -> Self {
        Self {
            label,
            decision_value,
        }
    }

    /// Get confidence as absolute value of decision value
    pub fn confidence(&self) -> f64 {
        self.decision_value.abs()
    }
}

/// Validated dense training problem: an N x D row-major matrix plus labels.
///
/// Construction performs all structural checks up front so the solver never
/// sees malformed input. Labels must be exactly -1.0 or +1.0.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    features: Vec<f64>,
    labels: Vec<f64>,
    dim: usize,
}

impl TrainingSet {
    /// Build a training set from feature rows and labels.
    ///
    /// Rejects count mismatches, empty input, zero dimension, ragged rows,
    /// labels outside {-1, +1} and non-finite feature values.
    pub fn new(rows: &[Vec<f64>], labels: &[f64]) -> Result<Self> {
        if rows.len() != labels.len() {
            return Err(SvmError::LabelCountMismatch {
                rows: rows.len(),
                labels: labels.len(),
            });
        }
        if rows.is_empty() {
            return Err(SvmError::EmptyTrainingSet);
        }
        let dim = rows[0].len();
        if dim == 0 {
            return Err(SvmError::ZeroDimension);
        }

        let mut features = Vec::with_capacity(rows.len() * dim);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(SvmError::RaggedRow {
                    row: i,
                    expected: dim,
                    actual: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(SvmError::NonFiniteFeature { row: i, col: j });
                }
            }
            features.extend_from_slice(row);
        }

        for &label in labels {
            if label != 1.0 && label != -1.0 {
                return Err(SvmError::InvalidLabel(label));
            }
        }

        Ok(Self {
            features,
            labels: labels.to_vec(),
            dim,
        })
    }

    /// Number of training examples
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the set holds no examples (never true for a constructed set)
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Feature dimension D
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Feature row i as a slice
    ///
    /// # Panics
    /// Panics if `i >= len()`
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.dim;
        &self.features[start..start + self.dim]
    }

    /// Label of example i
    pub fn label(&self, i: usize) -> f64 {
        self.labels[i]
    }

    /// All labels
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }
}

/// Result of the dual optimization
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Lagrange multipliers (alpha values), one per training example
    pub alpha: Vec<f64>,
    /// Bias term rho; decision function is sum_i alpha_i y_i K(x_i, v) - rho
    pub rho: f64,
    /// Whether the violation gap fell below tolerance
    pub converged: bool,
    /// Number of working-pair iterations performed
    pub iterations: usize,
    /// Final dual objective value
    pub objective_value: f64,
}

/// Configuration for the trainer and solver
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Regularization parameter (upper bound for alpha)
    pub c: f64,
    /// Convergence tolerance on the violation gap
    pub tolerance: f64,
    /// Maximum number of working-pair iterations
    pub max_iterations: usize,
    /// Number of kernel rows held by the LRU row cache
    pub cache_rows: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 1e-3,
            max_iterations: 10_000,
            cache_rows: 256,
        }
    }
}

impl TrainConfig {
    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.c <= 0.0 || !self.c.is_finite() {
            return Err(SvmError::InvalidParameter(format!(
                "C must be positive and finite, got {}",
                self.c
            )));
        }
        if self.tolerance <= 0.0 || !self.tolerance.is_finite() {
            return Err(SvmError::InvalidParameter(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(SvmError::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction() {
        let pred = Prediction::new(1.0, 2.5);
        assert_eq!(pred.label, 1.0);
        assert_eq!(pred.decision_value, 2.5);
        assert_eq!(pred.confidence(), 2.5);

        let neg_pred = Prediction::new(-1.0, -1.8);
        assert_eq!(neg_pred.confidence(), 1.8);
    }

    #[test]
    fn test_training_set_basic() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let labels = vec![1.0, -1.0];
        let set = TrainingSet::new(&rows, &labels).expect("Should build");

        assert_eq!(set.len(), 2);
        assert_eq!(set.dim(), 2);
        assert_eq!(set.row(0), &[1.0, 2.0]);
        assert_eq!(set.row(1), &[3.0, 4.0]);
        assert_eq!(set.label(1), -1.0);
        assert_eq!(set.labels(), &[1.0, -1.0]);
    }

    #[test]
    fn test_training_set_count_mismatch() {
        let rows = vec![vec![1.0], vec![2.0]];
        let result = TrainingSet::new(&rows, &[1.0]);
        assert!(matches!(
            result,
            Err(SvmError::LabelCountMismatch { rows: 2, labels: 1 })
        ));
    }

    #[test]
    fn test_training_set_empty() {
        let result = TrainingSet::new(&[], &[]);
        assert!(matches!(result, Err(SvmError::EmptyTrainingSet)));
    }

    #[test]
    fn test_training_set_zero_dimension() {
        let result = TrainingSet::new(&[vec![]], &[1.0]);
        assert!(matches!(result, Err(SvmError::ZeroDimension)));
    }

    #[test]
    fn test_training_set_ragged_row() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let result = TrainingSet::new(&rows, &[1.0, -1.0]);
        assert!(matches!(
            result,
            Err(SvmError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_training_set_invalid_label() {
        let rows = vec![vec![1.0], vec![2.0]];
        let result = TrainingSet::new(&rows, &[1.0, 0.5]);
        assert!(matches!(result, Err(SvmError::InvalidLabel(l)) if l == 0.5));
    }

    #[test]
    fn test_training_set_non_finite_feature() {
        let rows = vec![vec![1.0, f64::NAN]];
        let result = TrainingSet::new(&rows, &[1.0]);
        assert!(matches!(
            result,
            Err(SvmError::NonFiniteFeature { row: 0, col: 1 })
        ));

        let rows = vec![vec![f64::INFINITY]];
        let result = TrainingSet::new(&rows, &[-1.0]);
        assert!(matches!(
            result,
            Err(SvmError::NonFiniteFeature { row: 0, col: 0 })
        ));
    }

    #[test]
    fn test_train_config_default() {
        let config = TrainConfig::default();
        assert_eq!(config.c, 1.0);
        assert_eq!(config.tolerance, 1e-3);
        assert_eq!(config.max_iterations, 10_000);
        assert_eq!(config.cache_rows, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_train_config_validation() {
        let mut config = TrainConfig::default();
        config.c = -1.0;
        assert!(matches!(
            config.validate(),
            Err(SvmError::InvalidParameter(_))
        ));

        let mut config = TrainConfig::default();
        config.tolerance = 0.0;
        assert!(config.validate().is_err());

        let mut config = TrainConfig::default();
        config.max_iterations = 0;
        assert!(config.validate().is_err());
    }
}
