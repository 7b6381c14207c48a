//! Repository port for projects and their memberships.

use crate::project::domain::{MemberId, Project, ProjectId, ProjectMember, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Project and membership persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project together with its creator's admin membership.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateProject`] when the project ID
    /// already exists.
    async fn create(&self, project: &Project, creator: &ProjectMember)
    -> ProjectRepositoryResult<()>;

    /// Persists changes to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Deletes a project and all of its memberships.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()>;

    /// Finds a project by identifier.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Returns every project `user_id` is a member of, newest first.
    async fn list_for_user(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>>;

    /// Adds a member to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateMember`] when the user is
    /// already a member, or [`ProjectRepositoryError::NotFound`] when the
    /// project does not exist.
    async fn add_member(&self, member: &ProjectMember) -> ProjectRepositoryResult<()>;

    /// Finds the membership of `user_id` in `project_id`.
    async fn find_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectRepositoryResult<Option<ProjectMember>>;

    /// Finds a membership record by its own identifier.
    async fn find_member_by_id(
        &self,
        id: MemberId,
    ) -> ProjectRepositoryResult<Option<ProjectMember>>;

    /// Lists the members of a project ordered by join time.
    async fn list_members(&self, project_id: ProjectId)
    -> ProjectRepositoryResult<Vec<ProjectMember>>;

    /// Removes a membership record.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::MemberNotFound`] when the record does
    /// not exist.
    async fn remove_member(&self, id: MemberId) -> ProjectRepositoryResult<()>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The user already belongs to the project.
    #[error("user {user_id} is already a member of project {project_id}")]
    DuplicateMember {
        /// Project the membership was requested for.
        project_id: ProjectId,
        /// User that already holds a membership.
        user_id: UserId,
    },

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// The membership record was not found.
    #[error("project member not found: {0}")]
    MemberNotFound(MemberId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
