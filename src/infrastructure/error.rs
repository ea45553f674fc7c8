//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// Infrastructure errors wrap application errors and add HTTP client setup failures.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("HTTP client error: {context}")]
    Http {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid host '{host}': {message}")]
    InvalidHost { host: String, message: String },
}

impl InfraError {
    pub fn http(context: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            context: context.into(),
            source,
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
