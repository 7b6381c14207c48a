//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use gorex::project::{
    adapters::memory::InMemoryProjectRepository, services::ProjectService,
};
use gorex::task::{adapters::memory::InMemoryTaskRepository, services::TaskService};
use mockable::DefaultClock;
use rstest::fixture;

/// Task service over in-memory repositories.
pub type Tasks = TaskService<InMemoryTaskRepository, InMemoryProjectRepository, DefaultClock>;
/// Project service over in-memory repositories.
pub type Projects =
    ProjectService<InMemoryProjectRepository, InMemoryTaskRepository, DefaultClock>;

/// Both services sharing one pair of repositories.
pub struct Stack {
    pub tasks: Tasks,
    pub projects: Projects,
    pub task_repository: Arc<InMemoryTaskRepository>,
    pub project_repository: Arc<InMemoryProjectRepository>,
}

/// Provides a fresh service stack for each test.
#[fixture]
pub fn stack() -> Stack {
    let task_repository = Arc::new(InMemoryTaskRepository::new());
    let project_repository = Arc::new(InMemoryProjectRepository::new());
    let clock = Arc::new(DefaultClock);
    Stack {
        tasks: TaskService::new(
            Arc::clone(&task_repository),
            Arc::clone(&project_repository),
            Arc::clone(&clock),
        ),
        projects: ProjectService::new(
            Arc::clone(&project_repository),
            Arc::clone(&task_repository),
            clock,
        ),
        task_repository,
        project_repository,
    }
}
