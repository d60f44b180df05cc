use thiserror::Error;

/// Errors raised by a live automation session.
#[derive(Error, Debug, Clone)]
pub enum SessionError {
    // ============================================================
    // Element Errors
    // ============================================================
    #[error("No such element: {0}")]
    NoSuchElement(String),

    #[error("Element {0} is stale (view destroyed)")]
    StaleElement(String),

    #[error("Invalid selector: {selector}")]
    InvalidSelector { selector: String },

    #[error("Element {id} is not interactable: {reason}")]
    NotInteractable { id: String, reason: String },

    // ============================================================
    // Driver Errors
    // ============================================================
    #[error("Command '{command}' failed: {message}")]
    Command { command: String, message: String },

    #[error("Unexpected driver response for '{command}': {detail}")]
    UnexpectedResponse { command: String, detail: String },

    #[error("Timeout: {operation}")]
    Timeout { operation: String },

    // ============================================================
    // System Errors
    // ============================================================
    #[error("Failed to connect to automation server: {0}")]
    Connect(String),

    #[error("Session not ready")]
    NotReady,

    #[error("Operation not supported: {0}")]
    NotSupported(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SessionError {
    /// True when the error means the element simply does not exist (any more).
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::NoSuchElement(_) | Self::StaleElement(_))
    }
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        SessionError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

/// Hard failure built by callers that require an element to exist.
#[derive(Debug, Clone, Error)]
#[error("Resolution failed for target '{target}': {reason} (tried: {})", attempted.join(", "))]
pub struct ResolutionError {
    pub target: String,
    pub reason: String,
    pub attempted: Vec<String>,
}
