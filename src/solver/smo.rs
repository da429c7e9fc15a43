//! Sequential Minimal Optimization (SMO) solver
//!
//! Solves the soft-margin dual problem
//!
//! ```text
//! min  1/2 a^T Q a - e^T a    s.t.  0 <= a_i <= C,  y^T a = 0
//! ```
//!
//! where Q_ij = y_i y_j K(x_i, x_j). Each iteration picks the maximal
//! violating pair, solves the two-variable subproblem analytically and
//! updates the gradient incrementally from the pair's kernel rows.

use crate::cache::KernelRowCache;
use crate::core::{Result, SolveOutcome, SvmError, TrainConfig, TrainingSet};
use crate::kernel::Kernel;
use log::{debug, info, warn};

/// Curvature floor for degenerate working pairs
const TAU: f64 = 1e-12;

/// Threshold below which an alpha is treated as zero
pub const SV_THRESHOLD: f64 = 1e-12;

/// SMO solver for the soft-margin dual problem
pub struct SmoSolver<'a, K: Kernel> {
    kernel: &'a K,
    config: &'a TrainConfig,
}

impl<'a, K: Kernel> SmoSolver<'a, K> {
    /// Create a new solver over the given kernel and configuration
    pub fn new(kernel: &'a K, config: &'a TrainConfig) -> Self {
        Self { kernel, config }
    }

    /// Solve the dual problem for a validated training set.
    ///
    /// Fails fast with [`SvmError::SingleClass`] when the equality constraint
    /// is infeasible; hitting the iteration limit is not an error and is
    /// reported through `converged = false` on the outcome.
    pub fn solve(&self, data: &TrainingSet) -> Result<SolveOutcome> {
        self.check_feasible(data)?;
        self.config.validate()?;

        let n = data.len();
        let y = data.labels();
        let c = self.config.c;

        let mut alpha = vec![0.0_f64; n];
        // Gradient of the dual objective; all alphas start at zero so G_i = -1
        let mut gradient = vec![-1.0_f64; n];
        let mut cache = KernelRowCache::new(self.kernel, data, self.config.cache_rows);

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            let (i, j, gap) = match self.select_working_pair(&alpha, &gradient, y) {
                Some(selection) => selection,
                None => {
                    // No feasible direction remains
                    converged = true;
                    break;
                }
            };

            if gap < self.config.tolerance {
                converged = true;
                break;
            }

            iterations += 1;
            if iterations % 1000 == 0 {
                debug!("iteration {}: violation gap {:.6e}", iterations, gap);
            }

            let row_i = cache.row(i);
            let row_j = cache.row(j);

            let old_alpha_i = alpha[i];
            let old_alpha_j = alpha[j];

            self.update_pair(i, j, &row_i, &row_j, &mut alpha, &gradient, y);

            // Rank-2 gradient update from the pair's kernel rows
            let delta_i = alpha[i] - old_alpha_i;
            let delta_j = alpha[j] - old_alpha_j;
            for t in 0..n {
                gradient[t] +=
                    y[t] * (y[i] * row_i[t] * delta_i + y[j] * row_j[t] * delta_j);
            }
        }

        if !converged {
            warn!(
                "SMO hit the iteration limit ({}) before reaching tolerance {:e}",
                self.config.max_iterations, self.config.tolerance
            );
        }

        let rho = self.compute_rho(&alpha, &gradient, y, c);
        let objective_value = dual_objective(&alpha, &gradient);

        let stats = cache.stats();
        info!(
            "SMO finished: {} iterations, converged = {}, objective = {:.6}, \
             cache hit rate {:.2}",
            iterations,
            converged,
            objective_value,
            stats.hit_rate()
        );

        Ok(SolveOutcome {
            alpha,
            rho,
            converged,
            iterations,
            objective_value,
        })
    }

    /// Reject single-class problems before any solver state exists
    fn check_feasible(&self, data: &TrainingSet) -> Result<()> {
        let labels = data.labels();
        let has_positive = labels.iter().any(|&y| y > 0.0);
        let has_negative = labels.iter().any(|&y| y < 0.0);
        if !has_positive || !has_negative {
            return Err(SvmError::SingleClass(labels[0]));
        }
        Ok(())
    }

    /// Maximal-violating-pair selection.
    ///
    /// i maximizes -y_t G_t over the "up" set (alpha can still grow in the
    /// positive direction), j minimizes it over the "down" set. Returns the
    /// pair and the violation gap, or `None` when either set is empty.
    fn select_working_pair(
        &self,
        alpha: &[f64],
        gradient: &[f64],
        y: &[f64],
    ) -> Option<(usize, usize, f64)> {
        let c = self.config.c;
        let mut g_max = f64::NEG_INFINITY;
        let mut g_min = f64::INFINITY;
        let mut best_i = None;
        let mut best_j = None;

        for t in 0..alpha.len() {
            let up = (y[t] > 0.0 && alpha[t] < c) || (y[t] < 0.0 && alpha[t] > 0.0);
            let down = (y[t] > 0.0 && alpha[t] > 0.0) || (y[t] < 0.0 && alpha[t] < c);
            let value = -y[t] * gradient[t];

            if up && value > g_max {
                g_max = value;
                best_i = Some(t);
            }
            if down && value < g_min {
                g_min = value;
                best_j = Some(t);
            }
        }

        match (best_i, best_j) {
            (Some(i), Some(j)) => Some((i, j, g_max - g_min)),
            _ => None,
        }
    }

    /// Analytic two-variable update for the working pair, clipped so both
    /// box constraints and the equality constraint stay satisfied.
    #[allow(clippy::too_many_arguments)]
    fn update_pair(
        &self,
        i: usize,
        j: usize,
        row_i: &[f64],
        row_j: &[f64],
        alpha: &mut [f64],
        gradient: &[f64],
        y: &[f64],
    ) {
        let c = self.config.c;
        // Curvature of the two-variable subproblem; the same expression
        // covers both label cases since y_i^2 = y_j^2 = 1
        let mut quad_coef = row_i[i] + row_j[j] - 2.0 * row_i[j];
        if quad_coef <= 0.0 {
            quad_coef = TAU;
        }

        if y[i] != y[j] {
            let delta = (-gradient[i] - gradient[j]) / quad_coef;
            let diff = alpha[i] - alpha[j];
            alpha[i] += delta;
            alpha[j] += delta;

            if diff > 0.0 {
                if alpha[j] < 0.0 {
                    alpha[j] = 0.0;
                    alpha[i] = diff;
                }
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = c - diff;
                }
            } else {
                if alpha[i] < 0.0 {
                    alpha[i] = 0.0;
                    alpha[j] = -diff;
                }
                if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = c + diff;
                }
            }
        } else {
            let delta = (gradient[i] - gradient[j]) / quad_coef;
            let sum = alpha[i] + alpha[j];
            alpha[i] -= delta;
            alpha[j] += delta;

            if sum > c {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = sum - c;
                }
                if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = sum - c;
                }
            } else {
                if alpha[j] < 0.0 {
                    alpha[j] = 0.0;
                    alpha[i] = sum;
                }
                if alpha[i] < 0.0 {
                    alpha[i] = 0.0;
                    alpha[j] = sum;
                }
            }
        }
    }

    /// Bias term: average of y_t G_t over free support vectors
    /// (0 < alpha < C), falling back to all support vectors, then to zero.
    fn compute_rho(&self, alpha: &[f64], gradient: &[f64], y: &[f64], c: f64) -> f64 {
        let mut sum = 0.0;
        let mut count = 0;
        for t in 0..alpha.len() {
            if alpha[t] > SV_THRESHOLD && alpha[t] < c - SV_THRESHOLD {
                sum += y[t] * gradient[t];
                count += 1;
            }
        }
        if count > 0 {
            return sum / count as f64;
        }

        sum = 0.0;
        count = 0;
        for t in 0..alpha.len() {
            if alpha[t] > SV_THRESHOLD {
                sum += y[t] * gradient[t];
                count += 1;
            }
        }
        if count > 0 {
            sum / count as f64
        } else {
            0.0
        }
    }
}

/// Dual objective e^T a - 1/2 a^T Q a, recovered from the final gradient in
/// O(N) as -1/2 * sum_t a_t (G_t - 1)
fn dual_objective(alpha: &[f64], gradient: &[f64]) -> f64 {
    let half_sum: f64 = alpha
        .iter()
        .zip(gradient.iter())
        .map(|(&a, &g)| a * (g - 1.0))
        .sum();
    -0.5 * half_sum
}
