//! Kernel functions for SVM

pub mod linear;
pub mod rbf;
pub mod traits;

pub use self::linear::*;
pub use self::rbf::*;
pub use self::traits::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of kernels supported by the trainer and the persisted model
/// format.
///
/// The enum delegates to the concrete kernel implementations so it can be
/// used anywhere a [`Kernel`] is expected, while staying serializable for
/// model persistence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SvmKernel {
    /// Dot-product kernel
    Linear,
    /// Gaussian kernel with explicit gamma
    Rbf { gamma: f64 },
}

impl SvmKernel {
    /// Linear kernel
    pub fn linear() -> Self {
        Self::Linear
    }

    /// RBF kernel with explicit gamma (must be positive)
    pub fn rbf(gamma: f64) -> Self {
        assert!(gamma > 0.0, "Gamma must be positive, got: {}", gamma);
        Self::Rbf { gamma }
    }

    /// RBF kernel with the 1 / n_features default gamma
    pub fn rbf_auto(n_features: usize) -> Self {
        let kernel = RbfKernel::with_auto_gamma(n_features);
        Self::Rbf {
            gamma: kernel.gamma(),
        }
    }

    /// Whether this is the linear kernel (enables the explicit weight vector)
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Linear)
    }
}

impl Default for SvmKernel {
    fn default() -> Self {
        Self::Linear
    }
}

impl Kernel for SvmKernel {
    fn compute(&self, x: &[f64], y: &[f64]) -> f64 {
        match *self {
            Self::Linear => LinearKernel.compute(x, y),
            Self::Rbf { gamma } => RbfKernel::new(gamma).compute(x, y),
        }
    }
}

impl fmt::Display for SvmKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Rbf { gamma } => write!(f, "rbf(gamma={})", gamma),
        }
    }
}
