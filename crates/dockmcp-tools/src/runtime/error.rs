//! Runtime error classification

use thiserror::Error;

/// Result type for runtime calls
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Failure reported by the container runtime
///
/// Each variant carries the daemon's own message verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuntimeError {
    /// The addressed container, image, network or volume does not exist
    #[error("{0}")]
    NotFound(String),

    /// The resource already exists or is in a conflicting state
    #[error("{0}")]
    Conflict(String),

    /// The registry rejected the credentials
    #[error("{0}")]
    AuthenticationFailure(String),

    /// The daemon did not answer in time
    #[error("{0}")]
    Timeout(String),

    /// Anything else
    #[error("{0}")]
    Other(String),
}

impl RuntimeError {
    /// The daemon's message
    pub fn message(&self) -> &str {
        match self {
            RuntimeError::NotFound(m)
            | RuntimeError::Conflict(m)
            | RuntimeError::AuthenticationFailure(m)
            | RuntimeError::Timeout(m)
            | RuntimeError::Other(m) => m,
        }
    }

    /// Classify an HTTP status returned by the daemon
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            404 => RuntimeError::NotFound(message),
            409 => RuntimeError::Conflict(message),
            401 | 403 => RuntimeError::AuthenticationFailure(message),
            408 | 504 => RuntimeError::Timeout(message),
            _ => RuntimeError::Other(message),
        }
    }

    /// Classify an error message embedded in a progress stream
    ///
    /// Build, pull and push report failures inside a successful HTTP
    /// response, so only the text is available.
    pub fn from_stream_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("unauthorized")
            || lower.contains("authentication required")
            || lower.contains("denied")
        {
            RuntimeError::AuthenticationFailure(message)
        } else if lower.contains("not found") || lower.contains("manifest unknown") {
            RuntimeError::NotFound(message)
        } else {
            RuntimeError::Other(message)
        }
    }

    /// Whether this is a `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, RuntimeError::NotFound(_))
    }
}

impl From<bollard::errors::Error> for RuntimeError {
    fn from(err: bollard::errors::Error) -> Self {
        use bollard::errors::Error;
        match err {
            Error::DockerResponseServerError {
                status_code,
                message,
            } => RuntimeError::from_status(status_code, message),
            Error::DockerStreamError { error } => RuntimeError::from_stream_message(error),
            Error::RequestTimeoutError => {
                RuntimeError::Timeout("Timeout error while waiting for the daemon".to_string())
            }
            other => RuntimeError::Other(other.to_string()),
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::Other(err.to_string())
    }
}
