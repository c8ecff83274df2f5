use std::io;

/// Errors that can occur during osc-common operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("zero-length command line")]
    EmptyCommandLine,

    #[error("unhandled error check type '{0}'")]
    UnrecognizedPolicy(String),

    #[error("invalid output error pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Logger initialization error: {0}")]
    LoggerInit(String),
}

impl Error {
    /// Configuration misuse that takes the fatal path instead of producing a
    /// failed result.
    pub fn is_unrecoverable(&self) -> bool {
        matches!(
            self,
            Error::EmptyCommandLine | Error::UnrecognizedPolicy(_) | Error::InvalidPattern { .. }
        )
    }
}

/// Result type alias for osc-common operations
pub type Result<T> = std::result::Result<T, Error>;
