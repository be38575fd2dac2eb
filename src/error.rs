//! Error types for the detection pipeline.
//!
//! The taxonomy splits two ways: fatal initialization errors that abort
//! startup before the loop ever runs, and transient per-tick errors that
//! are logged and absorbed so the loop keeps running.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, SentinelError>;

/// Errors that can occur during detector setup and operation.
#[derive(Debug, Error)]
pub enum SentinelError {
    /// Loaded model's schema version disagrees with the runtime.
    ///
    /// Fatal at initialization; the control loop never starts.
    #[error("model schema version {found} not equal to supported version {supported}")]
    SchemaVersionMismatch { found: u8, supported: u8 },

    /// Tensor arena too small for the model's working buffers.
    ///
    /// Fatal at initialization.
    #[error("buffer allocation failed: model needs {needed} bytes, arena holds {arena}")]
    BufferAllocationFailed { needed: usize, arena: usize },

    /// Malformed or incompatible model container.
    ///
    /// Fatal at initialization.
    #[error("invalid model: {reason}")]
    InvalidModel { reason: String },

    /// Configuration rejected by validation.
    ///
    /// Fatal at initialization.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Slice computation against the timestamp source failed.
    ///
    /// Transient: log, skip the tick, continue looping.
    #[error("feature generation failed: {reason}")]
    FeatureGenerationFailed { reason: String },

    /// The model runtime reported a non-success status.
    ///
    /// Transient: log, skip decide/actuate for this window, continue.
    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },

    /// I/O error while reading model bytes.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SentinelError {
    /// Create a new invalid model error.
    #[must_use]
    pub fn invalid_model(reason: impl Into<String>) -> Self {
        Self::InvalidModel {
            reason: reason.into(),
        }
    }

    /// Create a new invalid config error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a new feature generation error.
    #[must_use]
    pub fn feature_generation(reason: impl Into<String>) -> Self {
        Self::FeatureGenerationFailed {
            reason: reason.into(),
        }
    }

    /// Create a new inference failure error.
    #[must_use]
    pub fn inference(reason: impl Into<String>) -> Self {
        Self::InferenceFailed {
            reason: reason.into(),
        }
    }

    /// Whether this error is recoverable within the loop.
    ///
    /// Transient errors skip the current tick or window; everything else
    /// aborts initialization.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::FeatureGenerationFailed { .. } | Self::InferenceFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_schema_version_mismatch() {
        let err = SentinelError::SchemaVersionMismatch {
            found: 3,
            supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "model schema version 3 not equal to supported version 1"
        );
    }

    #[test]
    fn test_error_display_buffer_allocation_failed() {
        let err = SentinelError::BufferAllocationFailed {
            needed: 20480,
            arena: 10240,
        };
        assert_eq!(
            err.to_string(),
            "buffer allocation failed: model needs 20480 bytes, arena holds 10240"
        );
    }

    #[test]
    fn test_error_display_invalid_model() {
        let err = SentinelError::invalid_model("magic bytes mismatch");
        assert_eq!(err.to_string(), "invalid model: magic bytes mismatch");
    }

    #[test]
    fn test_error_display_feature_generation() {
        let err = SentinelError::feature_generation("capture device stalled");
        assert_eq!(
            err.to_string(),
            "feature generation failed: capture device stalled"
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(SentinelError::inference("invoke returned error").is_transient());
        assert!(SentinelError::feature_generation("timestamp source down").is_transient());
        assert!(!SentinelError::invalid_model("truncated").is_transient());
        assert!(!SentinelError::SchemaVersionMismatch {
            found: 2,
            supported: 1
        }
        .is_transient());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "model file missing");
        let err: SentinelError = io_err.into();
        assert!(err.to_string().contains("io error"));
        assert!(!err.is_transient());
    }
}
