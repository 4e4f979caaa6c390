//! Error types for the crossbar access model

use smallvec::SmallVec;
use std::path::PathBuf;
use thiserror::Error;

/// Tensor shape as carried in errors and records
pub type Shape = SmallVec<[usize; 4]>;

/// Result type alias for simulator operations
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised by the access model and its configuration layer
#[derive(Debug, Error)]
pub enum SimError {
    /// Dataflow or kernel combination the model does not implement
    #[error("Unsupported configuration: {reason}")]
    UnsupportedConfiguration {
        /// What was rejected
        reason: String,
    },

    /// Input dimensions differ from the configured topology
    #[error("Shape mismatch: expected {expected:?}, found {found:?} (only full utilization is supported)")]
    ShapeMismatch {
        /// Shape the component was built for
        expected: Shape,
        /// Shape that was supplied
        found: Shape,
    },

    /// Configuration values that can never describe a crossbar
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Reason for failure
        reason: String,
    },

    /// I/O error on a config or counts file
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that was accessed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// TOML config could not be parsed
    #[error("Failed to parse config: {source}")]
    ConfigParse {
        /// Underlying parser error
        #[from]
        source: toml::de::Error,
    },

    /// Counts record or report could not be (de)serialized
    #[error("JSON error: {source}")]
    Json {
        /// Underlying serde_json error
        #[from]
        source: serde_json::Error,
    },
}

impl SimError {
    /// Create an unsupported-configuration error
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedConfiguration {
            reason: reason.into(),
        }
    }

    /// Create a shape-mismatch error
    pub fn shape_mismatch(expected: &[usize], found: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create an invalid-config error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_message_names_both_shapes() {
        let err = SimError::shape_mismatch(&[2, 2], &[3, 2, 4, 4]);
        let msg = err.to_string();
        assert!(msg.contains("[2, 2]"));
        assert!(msg.contains("[3, 2, 4, 4]"));
    }

    #[test]
    fn unsupported_keeps_reason() {
        let err = SimError::unsupported("input_stationary dataflow");
        assert!(matches!(
            err,
            SimError::UnsupportedConfiguration { ref reason } if reason == "input_stationary dataflow"
        ));
    }
}
