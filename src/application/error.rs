//! Application-level errors (wraps domain errors)

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::DomainError;

/// HTTP status bucket of a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Internal,
    Other,
}

impl StatusClass {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500..=599 => Self::Internal,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BadRequest => "bad request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::Internal => "internal server error",
            Self::Other => "unexpected status",
        };
        f.write_str(label)
    }
}

/// A non-2xx response from the control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub status: u16,
    pub class: StatusClass,
    /// `METHOD path` of the failed request.
    pub operation: String,
    /// Server-provided message, possibly empty.
    pub message: String,
    /// Replaces the message when the resource does not exist.
    pub hint: Option<String>,
}

impl RemoteError {
    pub fn new(status: u16, operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            class: StatusClass::from_status(status),
            operation: operation.into(),
            message: message.into(),
            hint: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.class == StatusClass::NotFound
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (true, Some(hint)) = (self.is_not_found(), &self.hint) {
            return f.write_str(hint);
        }
        write!(f, "{} ({}) on {}", self.class, self.status, self.operation)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for RemoteError {}

/// Application errors wrap domain errors and add payload and remote concerns.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("unable to parse {path}: {message}")]
    MalformedFile { path: PathBuf, message: String },

    #[error("unable to read inline config as a file or as JSON: {message}")]
    InvalidInlineConfig { message: String },

    #[error("{0}")]
    Remote(#[from] RemoteError),

    #[error("{} of {total} clusters failed: {}", .failed.len(), .failed.join(", "))]
    PartialFanout { failed: Vec<String>, total: usize },

    #[error("request failed: {context}")]
    Transport {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected response for {context}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The remote error carried by this error, if any.
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(remote) => Some(remote),
            _ => None,
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
