//! Port through which the board persists status changes.

use crate::failure::FailureCause;
use crate::task::domain::{Task, TaskId, TaskStatus};
use crate::task::services::TaskServiceError;
use async_trait::async_trait;
use thiserror::Error;

/// Result type for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Store contract used by the board controller.
#[async_trait]
pub trait TaskStatusGateway: Send + Sync {
    /// Persists `status` for `task_id` and returns the stored task.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] classified by [`FailureCause`] when the store
    /// refuses the change or cannot be reached.
    async fn persist_status(&self, task_id: TaskId, status: TaskStatus) -> GatewayResult<Task>;
}

/// Refusal or transport failure reported by a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{cause}: {message}")]
pub struct GatewayError {
    cause: FailureCause,
    message: String,
}

impl GatewayError {
    /// Creates an error of the given class.
    #[must_use]
    pub fn new(cause: FailureCause, message: impl Into<String>) -> Self {
        Self {
            cause,
            message: message.into(),
        }
    }

    /// Returns the failure class.
    #[must_use]
    pub const fn cause(&self) -> FailureCause {
        self.cause
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<TaskServiceError> for GatewayError {
    fn from(err: TaskServiceError) -> Self {
        Self::new(err.cause(), err.to_string())
    }
}
