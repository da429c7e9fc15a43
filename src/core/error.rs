//! Error types for SVM training and inference

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SvmError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Label count mismatch: {rows} rows but {labels} labels")]
    LabelCountMismatch { rows: usize, labels: usize },

    #[error("Empty training set")]
    EmptyTrainingSet,

    #[error("Zero feature dimension")]
    ZeroDimension,

    #[error("Row {row} has {actual} features, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid label: expected -1 or +1, got {0}")]
    InvalidLabel(f64),

    #[error("Non-finite feature value at row {row}, column {col}")]
    NonFiniteFeature { row: usize, col: usize },

    #[error("Training set contains a single class ({0}); equality constraint is infeasible")]
    SingleClass(f64),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Model not trained")]
    ModelNotTrained,

    #[error("Model format error: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SvmError>;
