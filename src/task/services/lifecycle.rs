//! Service layer for task creation, editing, and status transitions.

use crate::failure::FailureCause;
use crate::project::{
    domain::{ProjectId, UserId},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::task::{
    domain::{
        NewTaskData, Task, TaskDomainError, TaskId, TaskPatch, TaskPriority, TaskStatus,
        TaskTitle, can_transition,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    priority: Option<String>,
    assignee_id: Option<UserId>,
    deadline: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: None,
            assignee_id: None,
            deadline: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority text, for example `HIGH`.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Assigns the task to a project member.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Request payload for a partial task update.
///
/// Fields left unset are not changed. The `clear_*` builders null out
/// optional fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<Option<String>>,
    status: Option<String>,
    priority: Option<String>,
    assignee_id: Option<Option<UserId>>,
    deadline: Option<Option<DateTime<Utc>>>,
}

impl UpdateTaskRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Replaces the status, given as wire text such as `IN_PROGRESS`.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Replaces or clears the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: Option<UserId>) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Replaces or clears the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<DateTime<Utc>>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn into_patch(self) -> Result<TaskPatch, TaskDomainError> {
        Ok(TaskPatch {
            title: self.title.map(TaskTitle::new).transpose()?,
            description: self.description,
            status: self
                .status
                .as_deref()
                .map(TaskStatus::try_from)
                .transpose()?,
            priority: self
                .priority
                .as_deref()
                .map(TaskPriority::try_from)
                .transpose()?,
            assignee_id: self.assignee_id,
            deadline: self.deadline,
        })
    }
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Membership lookup failed.
    #[error(transparent)]
    Membership(#[from] ProjectRepositoryError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The actor is not a member of the task's project.
    #[error("user {actor} is not a member of project {project_id}")]
    Forbidden {
        /// Acting user.
        actor: UserId,
        /// Project the actor tried to act in.
        project_id: ProjectId,
    },
    /// The requested assignee does not belong to the project.
    #[error("assignee must be a project member")]
    AssigneeNotMember(UserId),
}

impl TaskServiceError {
    /// Classifies the error for transport layers.
    #[must_use]
    pub const fn cause(&self) -> FailureCause {
        match self {
            Self::Domain(_) | Self::AssigneeNotMember(_) => FailureCause::Validation,
            Self::Forbidden { .. } => FailureCause::Forbidden,
            Self::TaskNotFound(_) | Self::Repository(TaskRepositoryError::NotFound(_)) => {
                FailureCause::NotFound
            }
            Self::Repository(_) | Self::Membership(_) => FailureCause::Server,
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task orchestration service.
///
/// Every operation is gated on the actor's membership in the owning
/// project.
pub struct TaskService<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    projects: Arc<P>,
    clock: Arc<C>,
}

impl<T, P, C> Clone for TaskService<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            projects: Arc::clone(&self.projects),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<T, P, C> TaskService<T, P, C>
where
    T: TaskRepository,
    P: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, projects: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            projects,
            clock,
        }
    }

    /// Creates a task in the `TODO` column.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] when the actor is not a
    /// project member, [`TaskServiceError::Domain`] for a blank title or
    /// unknown priority, or [`TaskServiceError::AssigneeNotMember`].
    pub async fn create_task(
        &self,
        actor: UserId,
        project_id: ProjectId,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        self.require_member(actor, project_id).await?;
        let title = TaskTitle::new(request.title)?;
        if let Some(assignee) = request.assignee_id {
            self.require_assignable(project_id, assignee).await?;
        }
        let priority = request
            .priority
            .as_deref()
            .map(TaskPriority::try_from)
            .transpose()
            .map_err(TaskDomainError::from)?
            .unwrap_or_default();

        let task = Task::new(
            NewTaskData {
                project_id,
                creator_id: actor,
                title,
                description: request.description,
                priority,
                assignee_id: request.assignee_id,
                deadline: request.deadline,
            },
            &*self.clock,
        );
        self.tasks.store(&task).await?;
        tracing::debug!(task_id = %task.id(), %project_id, %actor, "task created");
        Ok(task)
    }

    /// Lists a project's tasks, highest priority first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Forbidden`] when the actor is not a
    /// project member.
    pub async fn list_project_tasks(
        &self,
        actor: UserId,
        project_id: ProjectId,
    ) -> TaskServiceResult<Vec<Task>> {
        self.require_member(actor, project_id).await?;
        Ok(self.tasks.list_by_project(project_id).await?)
    }

    /// Applies a partial update to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`],
    /// [`TaskServiceError::Forbidden`], [`TaskServiceError::AssigneeNotMember`],
    /// or [`TaskServiceError::Domain`] for unparseable fields.
    pub async fn update_task(
        &self,
        actor: UserId,
        task_id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let mut task = self.load(task_id).await?;
        let is_member = self.is_member(actor, task.project_id()).await?;
        if !is_member {
            return Err(refuse(actor, task.project_id()));
        }
        let patch = request.into_patch()?;
        if let Some(assignee) = patch.assigned_user() {
            self.require_assignable(task.project_id(), assignee).await?;
        }
        let requested = patch.status.unwrap_or(task.status());
        if !can_transition(task.status(), requested, is_member) {
            return Err(refuse(actor, task.project_id()));
        }
        if patch.is_empty() {
            return Ok(task);
        }

        task.apply(patch, &*self.clock);
        self.tasks.update(&task).await?;
        tracing::debug!(%task_id, %actor, "task updated");
        Ok(task)
    }

    /// Moves a task to another board column.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] or
    /// [`TaskServiceError::Forbidden`] when the transition is not allowed.
    pub async fn transition_task(
        &self,
        actor: UserId,
        task_id: TaskId,
        status: TaskStatus,
    ) -> TaskServiceResult<Task> {
        let mut task = self.load(task_id).await?;
        let is_member = self.is_member(actor, task.project_id()).await?;
        if !can_transition(task.status(), status, is_member) {
            return Err(refuse(actor, task.project_id()));
        }
        if task.status() == status {
            return Ok(task);
        }

        let from = task.status();
        task.set_status(status, &*self.clock);
        self.tasks.update(&task).await?;
        tracing::debug!(%task_id, from = from.as_str(), to = status.as_str(), "task moved");
        Ok(task)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::TaskNotFound`] or
    /// [`TaskServiceError::Forbidden`].
    pub async fn delete_task(&self, actor: UserId, task_id: TaskId) -> TaskServiceResult<()> {
        let task = self.load(task_id).await?;
        self.require_member(actor, task.project_id()).await?;
        self.tasks.delete(task_id).await?;
        tracing::debug!(%task_id, %actor, "task deleted");
        Ok(())
    }

    async fn load(&self, task_id: TaskId) -> TaskServiceResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(task_id))
    }

    async fn is_member(&self, user: UserId, project_id: ProjectId) -> TaskServiceResult<bool> {
        Ok(self.projects.find_member(project_id, user).await?.is_some())
    }

    async fn require_member(&self, actor: UserId, project_id: ProjectId) -> TaskServiceResult<()> {
        if self.is_member(actor, project_id).await? {
            Ok(())
        } else {
            Err(refuse(actor, project_id))
        }
    }

    async fn require_assignable(
        &self,
        project_id: ProjectId,
        assignee: UserId,
    ) -> TaskServiceResult<()> {
        if self.is_member(assignee, project_id).await? {
            Ok(())
        } else {
            Err(TaskServiceError::AssigneeNotMember(assignee))
        }
    }
}

fn refuse(actor: UserId, project_id: ProjectId) -> TaskServiceError {
    tracing::warn!(%actor, %project_id, "task access refused");
    TaskServiceError::Forbidden { actor, project_id }
}
