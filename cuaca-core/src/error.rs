//! Error types for the cuaca-core crate.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the prediction pipeline.
#[derive(Debug, Error)]
pub enum CuacaError {
    /// A required artifact (dataset or model) is missing at startup.
    #[error("{resource} not found at {}", path.display())]
    ResourceUnavailable { resource: String, path: PathBuf },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Could not read uploaded file: {0}")]
    UploadParseFailure(String),

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CuacaError {
    pub fn resource_unavailable(resource: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::ResourceUnavailable {
            resource: resource.into(),
            path: path.into(),
        }
    }

    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::ColumnNotFound(name.into())
    }

    pub fn upload(msg: impl Into<String>) -> Self {
        Self::UploadParseFailure(msg.into())
    }

    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::PredictionFailed(msg.into())
    }

    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error ends the session instead of being shown inline.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ResourceUnavailable { .. })
    }
}

pub type Result<T, E = CuacaError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_unavailable_message() {
        let err = CuacaError::resource_unavailable("Dataset", "dpc.csv");
        assert_eq!(err.to_string(), "Dataset not found at dpc.csv");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_per_request_errors_are_not_fatal() {
        assert!(!CuacaError::prediction("boom").is_fatal());
        assert!(!CuacaError::upload("bad csv").is_fatal());
        assert!(!CuacaError::column_not_found("Pressure").is_fatal());
    }
}
