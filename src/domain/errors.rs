//! Domain error types
//!
//! All errors are domain-specific and don't leak third-party types to
//! callers; dataframe and I/O errors are wrapped at the boundary.

use thiserror::Error;

/// Main error type used throughout the crate
#[derive(Debug, Error)]
pub enum FigaroError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Flow store errors (partitioned parquet access)
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Analysis errors (malformed frames, impossible aggregations)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Output writing errors (CSV/JSON artifacts)
    #[error("Output error: {0}")]
    Output(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Errors raised by the partitioned flow store
///
/// A missing partition is NOT an error; it resolves to an empty frame at
/// the accessor. These variants cover genuine failures only.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Data root does not exist or is not a directory
    #[error("Data directory not found: {0}")]
    RootNotFound(String),

    /// A partition file exists but could not be read
    #[error("Failed to read partition {partition}: {message}")]
    PartitionRead { partition: String, message: String },

    /// Dataframe operation failed
    #[error("Dataframe error: {0}")]
    Dataframe(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for FigaroError {
    fn from(err: std::io::Error) -> Self {
        FigaroError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for FigaroError {
    fn from(err: serde_json::Error) -> Self {
        FigaroError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for FigaroError {
    fn from(err: toml::de::Error) -> Self {
        FigaroError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Dataframe errors surface as analysis errors unless a store wraps them
// with partition context first.
impl From<polars::error::PolarsError> for FigaroError {
    fn from(err: polars::error::PolarsError) -> Self {
        FigaroError::Analysis(err.to_string())
    }
}

impl From<polars::error::PolarsError> for StoreError {
    fn from(err: polars::error::PolarsError) -> Self {
        StoreError::Dataframe(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figaro_error_display() {
        let err = FigaroError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::RootNotFound("data/parquet".to_string());
        let err: FigaroError = store_err.into();
        assert!(matches!(err, FigaroError::Store(_)));
    }

    #[test]
    fn test_partition_read_display() {
        let err = StoreError::PartitionRead {
            partition: "base=2019/ctr=DE".to_string(),
            message: "corrupt footer".to_string(),
        };
        assert!(err.to_string().contains("base=2019/ctr=DE"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: FigaroError = io_err.into();
        assert!(matches!(err, FigaroError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: FigaroError = json_err.into();
        assert!(matches!(err, FigaroError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: FigaroError = toml_err.into();
        assert!(matches!(err, FigaroError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_figaro_error_implements_std_error() {
        let err = FigaroError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
