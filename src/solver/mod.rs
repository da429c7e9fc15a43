//! SVM solver implementation
//!
//! Implements Sequential Minimal Optimization with maximal-violating-pair
//! working set selection, in the style of LIBSVM's dual solver.

pub mod smo;

pub use self::smo::*;
