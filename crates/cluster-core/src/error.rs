use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("vectors must have at least one dimension")]
    ZeroDimension,

    #[error("grid row {row} has {actual} columns, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("point {index} contains a non-finite coordinate")]
    NonFiniteValue { index: usize },

    #[error("coordinate {index} out of range for dimension {dimension}")]
    CoordinateOutOfRange { index: usize, dimension: usize },
}

pub type Result<T> = std::result::Result<T, CoreError>;
