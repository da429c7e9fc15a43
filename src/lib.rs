//! Dense-feature binary Support Vector Machine
//!
//! Trains a maximum-margin classifier from an in-memory matrix of dense
//! feature rows and {-1, +1} labels, using an SMO-style dual solver with
//! maximal-violating-pair working set selection.

pub mod api;
pub mod cache;
pub mod core;
pub mod kernel;
pub mod optimizer;
pub mod persistence;
pub mod solver;

// Re-export main types for convenience
pub use crate::api::{Svm, SvmClassifier};
pub use crate::cache::{CacheStats, KernelRowCache};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::core::{Result, SvmError};
pub use crate::kernel::{Kernel, LinearKernel, RbfKernel, SvmKernel};
pub use crate::optimizer::{SvmTrainer, TrainedSvm};
pub use crate::persistence::SavedModel;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
