//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// A status value outside the four board columns was supplied.
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatusError),

    /// A priority value outside the supported levels was supplied.
    #[error(transparent)]
    InvalidPriority(#[from] ParseTaskPriorityError),
}

/// Error returned when text does not name one of the four task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid task status: {0}")]
pub struct InvalidStatusError(pub String);

/// Error returned when text does not name a task priority.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
