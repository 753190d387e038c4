//! Error conversion helpers for I/O on project state files

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Attach the action and path to an I/O error.
    ///
    /// ```ignore
    /// fs.write(&session_file, &content)
    ///     .with_path_context("write session", &session_file)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::OperationFailed {
            context: format!("{action}: {}", path.display()),
            source: Box::new(source),
        })
    }
}
