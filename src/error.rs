//! Error types for mandala-board.
//!
//! Two families of failure exist. Network/API failures are recoverable: the
//! board substitutes fallback data and keeps going. User-input failures
//! (empty or unparseable transcripts) abort an operation before any request
//! is made and are surfaced as an inline status.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::GridId;

/// Primary error type for mandala-board operations.
#[derive(Error, Debug)]
pub enum BoardError {
    /// The API answered with a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message taken from the JSON error body, or a status-based default.
        message: String,
    },

    /// The request never produced a usable response.
    #[error("HTTP request failed: {context}")]
    Http {
        /// Endpoint or operation that failed.
        context: String,
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },

    /// The client runs without a backend.
    #[error("API unavailable: running in offline mode")]
    Offline,

    /// Submitted transcript was blank.
    #[error("Paste transcript text before submitting")]
    EmptyTranscript,

    /// Transcript produced no segments after splitting.
    #[error("Could not split the transcript into segments, please check the format")]
    UnparseableTranscript,

    /// Grid not present in the loaded collection.
    #[error("Grid not found: #{grid_id}")]
    GridNotFound {
        /// Grid id that was requested.
        grid_id: GridId,
    },

    /// Invalid argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    IoError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {context}")]
    SerializationError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// TUI error.
    #[error("TUI error: {message}")]
    TuiError {
        /// Human-readable error message.
        message: String,
    },
}

impl BoardError {
    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            context: context.into(),
            source,
        }
    }

    /// Create a new HTTP transport error with context.
    #[must_use]
    pub fn http(context: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            context: context.into(),
            source,
        }
    }

    /// Create an API error from a status code and optional server message.
    #[must_use]
    pub fn api(status: u16, message: Option<String>) -> Self {
        Self::Api {
            status,
            message: message.unwrap_or_else(|| format!("API error ({status})")),
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Api { .. } | Self::Http { .. } | Self::Offline => exit_codes::EXIT_API_ERROR,
            Self::EmptyTranscript | Self::UnparseableTranscript => exit_codes::EXIT_DATA_ERROR,
            Self::GridNotFound { .. } | Self::FileNotFound { .. } => exit_codes::EXIT_NOT_FOUND,
            Self::InvalidArgument { .. } => exit_codes::EXIT_USAGE_ERROR,
            Self::ConfigError { .. } | Self::InvalidConfig { .. } => exit_codes::EXIT_CONFIG_ERROR,
            Self::IoError { .. } => exit_codes::EXIT_IO_ERROR,
            _ => exit_codes::EXIT_GENERAL_ERROR,
        }
    }

    /// Check if this error is recoverable with local fallback data.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Http { .. } | Self::Offline)
    }

    /// Check if this error came from user input rather than the network.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::EmptyTranscript | Self::UnparseableTranscript)
    }
}

/// Result type alias for mandala-board operations.
pub type Result<T> = std::result::Result<T, BoardError>;

impl From<std::io::Error> for BoardError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

/// Exit codes for CLI operations.
pub mod exit_codes {
    /// Operation completed successfully.
    pub const EXIT_SUCCESS: i32 = 0;
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// The board API failed or is unreachable.
    pub const EXIT_API_ERROR: i32 = 2;
    /// Requested grid or file not found.
    pub const EXIT_NOT_FOUND: i32 = 3;
    /// Invalid configuration.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// Invalid command-line usage (BSD standard).
    pub const EXIT_USAGE_ERROR: i32 = 64;
    /// Input data format error (BSD standard).
    pub const EXIT_DATA_ERROR: i32 = 65;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
}
