//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::CourseId;

/// Domain errors represent catalog rule violations.
/// None of them is fatal; callers report them and carry on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("course not found: {0}")]
    NotFound(CourseId),

    #[error("course already exists: {0}")]
    Duplicate(CourseId),

    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("invalid course: {0}")]
    InvalidCourse(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
