//! Error types for page_graph
//!
//! Every fallible operation in the crate returns [`Result`]. The variants map
//! onto the three failure families of the pipeline (bad arguments, missing
//! data, degenerate input) plus configuration, I/O and serialization failures
//! at the crate's outer edges.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PageGraphError>;

/// Main error type for page_graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageGraphError {
    /// An argument is outside its valid domain (page count, `k`, root, permutation)
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Source text or similarity backend is unreachable or returned nothing usable
    #[error("Data unavailable: {message}")]
    DataUnavailable { message: String },

    /// Input too small for similarity or sequencing to be defined
    #[error("Degenerate input: {message}")]
    DegenerateInput { message: String },

    /// Configuration validation failed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Reading or writing a file failed
    #[error("I/O error: {message}")]
    Io { message: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl PageGraphError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a data unavailable error
    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::DataUnavailable {
            message: message.into(),
        }
    }

    /// Create a degenerate input error
    pub fn degenerate_input(message: impl Into<String>) -> Self {
        Self::DegenerateInput {
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Check if this error is caused by the caller's arguments rather than the data
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. } | Self::InvalidConfig { .. })
    }
}

impl From<serde_json::Error> for PageGraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<std::io::Error> for PageGraphError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}
