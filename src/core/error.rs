//! Error types for the logging pipeline

pub type Result<T> = std::result::Result<T, LogError>;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Malformed or incomplete adapter configuration
    #[error("invalid configuration for {adapter}: {message}")]
    Config { adapter: String, message: String },

    /// Adapter config blob is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No constructor registered under the requested name
    #[error("unknown adapter {name:?} (forgotten register?)")]
    UnknownAdapter { name: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File adapter error with path
    #[error("file adapter error for '{path}': {message}")]
    File { path: String, message: String },

    /// File rotation error
    #[error("rotation failed for '{path}': {message}")]
    Rotation { path: String, message: String },

    /// Logger mutated after close()
    #[error("logger already closed")]
    Closed,
}

impl LogError {
    /// Create an invalid configuration error
    pub fn config(adapter: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::Config {
            adapter: adapter.into(),
            message: message.into(),
        }
    }

    /// Create an unknown adapter error
    pub fn unknown_adapter(name: impl Into<String>) -> Self {
        LogError::UnknownAdapter { name: name.into() }
    }

    /// Create a file adapter error
    pub fn file(path: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::File {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::Rotation {
            path: path.into(),
            message: message.into(),
        }
    }
}
