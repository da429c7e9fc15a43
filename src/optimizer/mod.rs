//! Training orchestration and the trained model
//!
//! [`SvmTrainer`] validates the problem, runs the SMO solver over a lazy
//! kernel row cache and compresses the result down to its support vectors.
//! [`TrainedSvm`] is the immutable artifact that evaluates the decision
//! function.

use crate::core::{Prediction, Result, SolveOutcome, SvmError, SvmModel, TrainConfig, TrainingSet};
use crate::kernel::{Kernel, SvmKernel};
use crate::solver::{SmoSolver, SV_THRESHOLD};
use log::info;

/// Trainer holding the kernel choice and solver configuration
pub struct SvmTrainer {
    kernel: SvmKernel,
    config: TrainConfig,
}

impl SvmTrainer {
    /// Create a trainer with the given kernel and configuration
    pub fn new(kernel: SvmKernel, config: TrainConfig) -> Self {
        Self { kernel, config }
    }

    /// Create a trainer with default configuration
    pub fn with_kernel(kernel: SvmKernel) -> Self {
        Self::new(kernel, TrainConfig::default())
    }

    /// Train on a validated training set
    pub fn train(&self, data: &TrainingSet) -> Result<TrainedSvm> {
        self.config.validate()?;

        let solver = SmoSolver::new(&self.kernel, &self.config);
        let outcome = solver.solve(data)?;

        let model = TrainedSvm::from_solution(self.kernel, data, &outcome);
        info!(
            "trained {} model: {} support vectors of {} examples, rho = {:.6}",
            self.kernel,
            model.n_support_vectors(),
            data.len(),
            model.bias()
        );
        Ok(model)
    }

    /// Train on raw feature rows and labels
    pub fn train_rows(&self, rows: &[Vec<f64>], labels: &[f64]) -> Result<TrainedSvm> {
        let data = TrainingSet::new(rows, labels)?;
        self.train(&data)
    }

    /// Get the trainer configuration
    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Get the kernel
    pub fn kernel(&self) -> SvmKernel {
        self.kernel
    }
}

/// A trained SVM model
///
/// Holds only the support vectors (training rows with alpha > 0), their
/// coefficients alpha_i * y_i, the bias rho and the kernel. For the linear
/// kernel an explicit weight vector w = sum_i alpha_i y_i x_i is precomputed
/// so evaluation is O(D) instead of O(|SV| * D); both paths agree to float
/// tolerance.
pub struct TrainedSvm {
    kernel: SvmKernel,
    support_vectors: Vec<Vec<f64>>,
    coefficients: Vec<f64>,
    rho: f64,
    weights: Option<Vec<f64>>,
    dim: usize,
    converged: bool,
    iterations: usize,
}

impl TrainedSvm {
    /// Compress a solver solution down to its support vectors
    fn from_solution(kernel: SvmKernel, data: &TrainingSet, outcome: &SolveOutcome) -> Self {
        let mut support_vectors = Vec::new();
        let mut coefficients = Vec::new();

        for (i, &alpha) in outcome.alpha.iter().enumerate() {
            if alpha > SV_THRESHOLD {
                support_vectors.push(data.row(i).to_vec());
                coefficients.push(alpha * data.label(i));
            }
        }

        Self::assemble(
            kernel,
            support_vectors,
            coefficients,
            outcome.rho,
            data.dim(),
            outcome.converged,
            outcome.iterations,
        )
    }

    /// Rebuild a model from persisted parts
    pub(crate) fn from_parts(
        kernel: SvmKernel,
        support_vectors: Vec<Vec<f64>>,
        coefficients: Vec<f64>,
        rho: f64,
        converged: bool,
        iterations: usize,
    ) -> Result<Self> {
        if support_vectors.len() != coefficients.len() {
            return Err(SvmError::Format(format!(
                "{} support vectors but {} coefficients",
                support_vectors.len(),
                coefficients.len()
            )));
        }
        let dim = support_vectors.first().map_or(0, |sv| sv.len());
        for sv in &support_vectors {
            if sv.len() != dim {
                return Err(SvmError::Format(
                    "support vectors have inconsistent dimensions".to_string(),
                ));
            }
        }
        Ok(Self::assemble(
            kernel,
            support_vectors,
            coefficients,
            rho,
            dim,
            converged,
            iterations,
        ))
    }

    fn assemble(
        kernel: SvmKernel,
        support_vectors: Vec<Vec<f64>>,
        coefficients: Vec<f64>,
        rho: f64,
        dim: usize,
        converged: bool,
        iterations: usize,
    ) -> Self {
        let weights = if kernel.is_linear() && !support_vectors.is_empty() {
            let mut w = vec![0.0; dim];
            for (sv, &coef) in support_vectors.iter().zip(coefficients.iter()) {
                for (w_j, &x_j) in w.iter_mut().zip(sv.iter()) {
                    *w_j += coef * x_j;
                }
            }
            Some(w)
        } else {
            None
        };

        Self {
            kernel,
            support_vectors,
            coefficients,
            rho,
            weights,
            dim,
            converged,
            iterations,
        }
    }

    /// Decision function value f(v) = sum_i alpha_i y_i K(x_i, v) - rho
    pub fn decision_function(&self, features: &[f64]) -> Result<f64> {
        if self.dim > 0 && features.len() != self.dim {
            return Err(SvmError::DimensionMismatch {
                expected: self.dim,
                actual: features.len(),
            });
        }

        if let Some(w) = &self.weights {
            let dot: f64 = w.iter().zip(features.iter()).map(|(&a, &b)| a * b).sum();
            return Ok(dot - self.rho);
        }

        let mut result = 0.0;
        for (sv, &coef) in self.support_vectors.iter().zip(self.coefficients.iter()) {
            result += coef * self.kernel.compute(sv, features);
        }
        Ok(result - self.rho)
    }

    /// Explicit weight vector; present only for the linear kernel
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// The kernel this model was trained with
    pub fn kernel(&self) -> SvmKernel {
        self.kernel
    }

    /// Stored support vectors
    pub fn support_vectors(&self) -> &[Vec<f64>] {
        &self.support_vectors
    }

    /// Coefficients alpha_i * y_i, one per support vector
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Whether the solver reached tolerance before the iteration limit
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Number of solver iterations performed
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl SvmModel for TrainedSvm {
    fn predict(&self, features: &[f64]) -> Result<Prediction> {
        let decision_value = self.decision_function(features)?;
        let label = if decision_value >= 0.0 { 1.0 } else { -1.0 };
        Ok(Prediction::new(label, decision_value))
    }

    fn n_support_vectors(&self) -> usize {
        self.support_vectors.len()
    }

    fn bias(&self) -> f64 {
        self.rho
    }
}
