use cluster_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KMeansError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("centroid dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("expected {expected} centroids, got {actual}")]
    CentroidCountMismatch { expected: usize, actual: usize },

    #[error("centroid index {index} out of range for {clusters} clusters")]
    CentroidOutOfRange { index: usize, clusters: usize },

    #[error("assignment covers {actual} points but the dataset has {expected}")]
    AssignmentMismatch { expected: usize, actual: usize },

    #[error("a centroid set needs at least one centroid")]
    EmptyCentroidSet,

    #[error("no restart produced a finite cost")]
    NoFiniteTrial,

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, KMeansError>;
