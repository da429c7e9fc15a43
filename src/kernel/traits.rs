//! Kernel trait definition

/// Kernel function trait
///
/// A kernel function K(x, y) must be symmetric and satisfy Mercer's condition
/// to be valid for SVM training. Both arguments are dense feature slices of
/// equal length.
pub trait Kernel: Send + Sync {
    /// Compute kernel value K(x, y)
    fn compute(&self, x: &[f64], y: &[f64]) -> f64;
}
