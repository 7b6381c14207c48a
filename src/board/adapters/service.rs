//! Gateway that talks to the task service in the same process.

use crate::board::ports::{GatewayResult, TaskStatusGateway};
use crate::project::{domain::UserId, ports::ProjectRepository};
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::TaskRepository,
    services::TaskService,
};
use async_trait::async_trait;
use mockable::Clock;

/// [`TaskStatusGateway`] backed by a [`TaskService`], acting as one user.
#[derive(Clone)]
pub struct ServiceGateway<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    service: TaskService<T, P, C>,
    actor: UserId,
}

impl<T, P, C> ServiceGateway<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a gateway issuing changes on behalf of `actor`.
    #[must_use]
    pub const fn new(service: TaskService<T, P, C>, actor: UserId) -> Self {
        Self { service, actor }
    }
}

#[async_trait]
impl<T, P, C> TaskStatusGateway for ServiceGateway<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    async fn persist_status(&self, task_id: TaskId, status: TaskStatus) -> GatewayResult<Task> {
        Ok(self
            .service
            .transition_task(self.actor, task_id, status)
            .await?)
    }
}
