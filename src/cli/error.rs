//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::{ApplicationError, StatusClass};
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("unable to render output: {0}")]
    Render(String),

    #[error("unable to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        ApplicationError::Domain(e).into()
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Render(_) => exitcode::SOFTWARE,
            CliError::Output(_) => exitcode::IOERR,
            CliError::Infra(e) => match e {
                InfraError::Http { .. } => exitcode::UNAVAILABLE,
                InfraError::InvalidHost { .. } => exitcode::CONFIG,
                InfraError::Application(e) => application_exit_code(e),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::Domain(_) => exitcode::USAGE,
        ApplicationError::MalformedFile { .. } | ApplicationError::InvalidInlineConfig { .. } => {
            exitcode::DATAERR
        }
        ApplicationError::Remote(remote) => match remote.class {
            StatusClass::NotFound => exitcode::NOINPUT,
            StatusClass::Unauthorized | StatusClass::Forbidden => exitcode::NOPERM,
            StatusClass::BadRequest => exitcode::DATAERR,
            StatusClass::Internal | StatusClass::Other => exitcode::UNAVAILABLE,
        },
        ApplicationError::Transport { .. } => exitcode::UNAVAILABLE,
        ApplicationError::Config { .. } => exitcode::CONFIG,
        ApplicationError::OperationFailed { .. } => exitcode::IOERR,
        ApplicationError::PartialFanout { .. } | ApplicationError::Decode { .. } => {
            exitcode::SOFTWARE
        }
    }
}
