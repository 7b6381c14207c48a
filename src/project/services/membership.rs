//! Service layer for project lifecycle and membership management.

use crate::failure::FailureCause;
use crate::project::{
    domain::{
        MemberId, MemberRole, ParseMemberRoleError, ParseProjectStatusError, Project,
        ProjectDomainError, ProjectId, ProjectMember, ProjectName, ProjectStatus, UserId,
    },
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: Option<String>,
}

impl CreateProjectRequest {
    /// Creates a request with the required project name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for adding a user to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteMemberRequest {
    user_id: UserId,
    role: Option<String>,
}

impl InviteMemberRequest {
    /// Creates a request that adds `user_id` with the default role.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            role: None,
        }
    }

    /// Sets the requested role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// The requested project status is unknown.
    #[error(transparent)]
    InvalidStatus(#[from] ParseProjectStatusError),
    /// The requested member role is unknown.
    #[error(transparent)]
    InvalidRole(#[from] ParseMemberRoleError),
    /// Project repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
    /// Task cleanup failed while deleting a project.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// The actor may not perform the operation on this project.
    #[error("user {actor} may not {action} in project {project_id}")]
    Forbidden {
        /// Acting user.
        actor: UserId,
        /// Target project.
        project_id: ProjectId,
        /// Short description of the refused action.
        action: &'static str,
    },
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
    /// The membership record does not exist in the project.
    #[error("project member not found: {0}")]
    MemberNotFound(MemberId),
    /// The user already belongs to the project.
    #[error("user {0} is already a member of the project")]
    AlreadyMember(UserId),
    /// Admin members cannot be removed.
    #[error("project admins cannot be removed: {0}")]
    CannotRemoveAdmin(MemberId),
}

impl ProjectServiceError {
    /// Classifies the error for transport layers.
    #[must_use]
    pub const fn cause(&self) -> FailureCause {
        match self {
            Self::Domain(_)
            | Self::InvalidStatus(_)
            | Self::InvalidRole(_)
            | Self::AlreadyMember(_)
            | Self::CannotRemoveAdmin(_) => FailureCause::Validation,
            Self::Forbidden { .. } => FailureCause::Forbidden,
            Self::ProjectNotFound(_)
            | Self::MemberNotFound(_)
            | Self::Repository(
                ProjectRepositoryError::NotFound(_) | ProjectRepositoryError::MemberNotFound(_),
            ) => FailureCause::NotFound,
            Self::Repository(ProjectRepositoryError::DuplicateMember { .. }) => {
                FailureCause::Validation
            }
            Self::Repository(_) | Self::Tasks(_) => FailureCause::Server,
        }
    }
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project and membership orchestration service.
#[derive(Clone)]
pub struct ProjectService<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    tasks: Arc<T>,
    clock: Arc<C>,
}

impl<P, T, C> ProjectService<P, T, C>
where
    P: ProjectRepository,
    T: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(projects: Arc<P>, tasks: Arc<T>, clock: Arc<C>) -> Self {
        Self {
            projects,
            tasks,
            clock,
        }
    }

    /// Creates a project; the creator becomes its first admin.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Domain`] for a blank name or
    /// [`ProjectServiceError::Repository`] when persistence fails.
    pub async fn create_project(
        &self,
        actor: UserId,
        request: CreateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let name = ProjectName::new(request.name)?;
        let project = Project::new(name, request.description, actor, &*self.clock);
        let creator = ProjectMember::new(project.id(), actor, MemberRole::Admin, &*self.clock);
        self.projects.create(&project, &creator).await?;
        tracing::debug!(project_id = %project.id(), %actor, "project created");
        Ok(project)
    }

    /// Lists the projects `actor` belongs to, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the lookup fails.
    pub async fn list_member_projects(&self, actor: UserId) -> ProjectServiceResult<Vec<Project>> {
        Ok(self.projects.list_for_user(actor).await?)
    }

    /// Lists the members of a project the actor belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Forbidden`] when the actor is not a
    /// member.
    pub async fn list_members(
        &self,
        actor: UserId,
        project_id: ProjectId,
    ) -> ProjectServiceResult<Vec<ProjectMember>> {
        self.require_member(actor, project_id, "list members").await?;
        Ok(self.projects.list_members(project_id).await?)
    }

    /// Adds a user to a project. Only admins may invite.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Forbidden`] when the actor is not an
    /// admin, [`ProjectServiceError::InvalidRole`] for an unknown role, or
    /// [`ProjectServiceError::AlreadyMember`] when the user already belongs
    /// to the project.
    pub async fn invite_member(
        &self,
        actor: UserId,
        project_id: ProjectId,
        request: InviteMemberRequest,
    ) -> ProjectServiceResult<ProjectMember> {
        self.require_admin(actor, project_id, "invite members").await?;
        let role = request
            .role
            .as_deref()
            .map(MemberRole::try_from)
            .transpose()?
            .unwrap_or_default();

        if self
            .projects
            .find_member(project_id, request.user_id)
            .await?
            .is_some()
        {
            return Err(ProjectServiceError::AlreadyMember(request.user_id));
        }

        let member = ProjectMember::new(project_id, request.user_id, role, &*self.clock);
        self.projects.add_member(&member).await?;
        tracing::debug!(%project_id, user_id = %request.user_id, role = role.as_str(), "member added");
        Ok(member)
    }

    /// Removes a non-admin member. Only admins may remove members.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Forbidden`] when the actor is not an
    /// admin, [`ProjectServiceError::MemberNotFound`] when the record does not
    /// belong to the project, or [`ProjectServiceError::CannotRemoveAdmin`]
    /// when the target is an admin.
    pub async fn remove_member(
        &self,
        actor: UserId,
        project_id: ProjectId,
        member_id: MemberId,
    ) -> ProjectServiceResult<ProjectMember> {
        self.require_admin(actor, project_id, "remove members").await?;
        let member = self
            .projects
            .find_member_by_id(member_id)
            .await?
            .filter(|found| found.project_id() == project_id)
            .ok_or(ProjectServiceError::MemberNotFound(member_id))?;
        if member.is_admin() {
            tracing::warn!(%project_id, %member_id, "refused to remove project admin");
            return Err(ProjectServiceError::CannotRemoveAdmin(member_id));
        }
        self.projects.remove_member(member_id).await?;
        tracing::debug!(%project_id, %member_id, "member removed");
        Ok(member)
    }

    /// Sets the lifecycle status of a project the actor belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::InvalidStatus`] for unknown status text,
    /// [`ProjectServiceError::Forbidden`] when the actor is not a member, or
    /// [`ProjectServiceError::ProjectNotFound`].
    pub async fn update_status(
        &self,
        actor: UserId,
        project_id: ProjectId,
        status: &str,
    ) -> ProjectServiceResult<Project> {
        let parsed = ProjectStatus::try_from(status)?;
        self.require_member(actor, project_id, "change status").await?;
        let mut project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(ProjectServiceError::ProjectNotFound(project_id))?;
        project.set_status(parsed, &*self.clock);
        self.projects.update(&project).await?;
        Ok(project)
    }

    /// Deletes a project with its tasks and memberships. Only the creator
    /// may delete.
    ///
    /// The project goes first, so a failed delete leaves its tasks intact.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::ProjectNotFound`] or
    /// [`ProjectServiceError::Forbidden`] when the actor is not the creator.
    pub async fn delete_project(
        &self,
        actor: UserId,
        project_id: ProjectId,
    ) -> ProjectServiceResult<()> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(ProjectServiceError::ProjectNotFound(project_id))?;
        if !project.is_created_by(actor) {
            return Err(refuse(actor, project_id, "delete the project"));
        }
        self.projects.delete(project_id).await?;
        let removed_tasks = self.tasks.delete_by_project(project_id).await?;
        tracing::debug!(%project_id, removed_tasks, "project deleted");
        Ok(())
    }

    async fn require_member(
        &self,
        actor: UserId,
        project_id: ProjectId,
        action: &'static str,
    ) -> ProjectServiceResult<ProjectMember> {
        self.projects
            .find_member(project_id, actor)
            .await?
            .ok_or_else(|| refuse(actor, project_id, action))
    }

    async fn require_admin(
        &self,
        actor: UserId,
        project_id: ProjectId,
        action: &'static str,
    ) -> ProjectServiceResult<ProjectMember> {
        self.projects
            .find_member(project_id, actor)
            .await?
            .filter(ProjectMember::is_admin)
            .ok_or_else(|| refuse(actor, project_id, action))
    }
}

fn refuse(actor: UserId, project_id: ProjectId, action: &'static str) -> ProjectServiceError {
    tracing::warn!(%actor, %project_id, action, "project access refused");
    ProjectServiceError::Forbidden {
        actor,
        project_id,
        action,
    }
}
