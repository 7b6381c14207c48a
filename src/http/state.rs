//! Shared handler state.

use crate::project::{ports::ProjectRepository, services::ProjectService};
use crate::task::{ports::TaskRepository, services::TaskService};
use mockable::Clock;
use std::sync::Arc;

/// Services shared by every request handler.
pub struct AppState<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Task operations.
    pub tasks: TaskService<T, P, C>,
    /// Project and membership operations.
    pub projects: ProjectService<P, T, C>,
    /// Clock used for overdue calculations.
    pub clock: Arc<C>,
}

impl<T, P, C> AppState<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Wires both services over the same repositories and clock.
    #[must_use]
    pub fn new(tasks: Arc<T>, projects: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            tasks: TaskService::new(Arc::clone(&tasks), Arc::clone(&projects), Arc::clone(&clock)),
            projects: ProjectService::new(projects, tasks, Arc::clone(&clock)),
            clock,
        }
    }
}
