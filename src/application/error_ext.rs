//! Error conversion helpers for common I/O operations
//!
//! Provides extension traits for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.write(&path, &content)
    ///     .with_path_context("write catalog", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;

    /// Map a failed read of a catalog source to `SourceNotText` when the
    /// content is not UTF-8, `SourceUnavailable` otherwise.
    fn with_source_context(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }

    fn with_source_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| match source.kind() {
            io::ErrorKind::InvalidData => ApplicationError::SourceNotText {
                path: path.to_path_buf(),
                source,
            },
            _ => ApplicationError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            },
        })
    }
}
