//! Errors raised while decoding and verifying rendered EMF documents
//!
//! The aggregation write path (`record`, `reset`, `render`) never fails;
//! these errors come from parsing documents back and from `cli_json`.

use thiserror::Error;

/// Result type alias using EmfError
pub type Result<T> = std::result::Result<T, EmfError>;

#[derive(Debug, Error)]
pub enum EmfError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("missing metadata field _aws")]
    MissingMetadata,

    #[error("missing dimension value for: {0}")]
    MissingDimension(String),

    #[error("dimension value not a string: {name}: {value}")]
    DimensionNotString { name: String, value: String },

    #[error("missing metric value for: {0}")]
    MissingMetric(String),

    #[error("metric value not a number: {name}: {value}")]
    MetricNotNumeric { name: String, value: String },

    #[error("namespace not found: {0}")]
    NamespaceNotFound(String),

    #[error("dimensions not found: {0}")]
    DimensionsNotFound(String),

    #[error("metric not found: {0}")]
    MetricNotFound(String),

    #[error("metric unit: expected={expected} got={actual}")]
    UnitMismatch { expected: String, actual: String },

    #[error("metric resolution: expected={expected} got={actual}")]
    ResolutionMismatch { expected: u32, actual: u32 },

    #[error("metric value: expected={expected} got={actual}")]
    ValueMismatch { expected: f64, actual: f64 },
}
