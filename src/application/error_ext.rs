//! Error conversion helpers
//!
//! Extension traits that attach context to failures at the call site.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.read_to_string(&path)
    ///     .with_path_context("read payload", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

/// Extension trait attaching a "does not exist" message to a remote lookup.
pub trait RemoteResultExt<T> {
    /// Use `hint` as the error message if the call failed with a not-found status.
    ///
    /// The hint is only built when the call failed.
    fn not_found_hint<F>(self, hint: F) -> ApplicationResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> RemoteResultExt<T> for ApplicationResult<T> {
    fn not_found_hint<F>(self, hint: F) -> ApplicationResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| match err {
            ApplicationError::Remote(mut remote) if remote.is_not_found() => {
                remote.hint = Some(hint());
                ApplicationError::Remote(remote)
            }
            other => other,
        })
    }
}
