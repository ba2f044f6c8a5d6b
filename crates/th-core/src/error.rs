//! Error types for threadhub

use thiserror::Error;

/// Main error type for threadhub
#[derive(Debug, Error)]
pub enum ThreadHubError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Post not found
    #[error("Post not found: {0}")]
    PostNotFound(String),

    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    /// Generic record lookup failure
    #[error("Record {id} not found in {collection}")]
    RecordNotFound { collection: String, id: String },

    /// A record with the same id already exists
    #[error("Record {id} already exists in {collection}")]
    DuplicateRecord { collection: String, id: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No signed-in identity
    #[error("Not signed in. Pass --as <user> or set identity.user in the config")]
    NotSignedIn,

    /// The current identity may not perform this action
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Unsupported schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    /// Backend store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ThreadHubError>,
    },
}

impl ThreadHubError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ThreadHubError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error means the requested record does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            ThreadHubError::PostNotFound(_)
            | ThreadHubError::CommentNotFound(_)
            | ThreadHubError::RecordNotFound { .. } => true,
            ThreadHubError::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

impl From<toml::de::Error> for ThreadHubError {
    fn from(err: toml::de::Error) -> Self {
        ThreadHubError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for ThreadHubError {
    fn from(err: toml::ser::Error) -> Self {
        ThreadHubError::Toml(err.to_string())
    }
}

/// Result type alias for threadhub
pub type Result<T> = std::result::Result<T, ThreadHubError>;
