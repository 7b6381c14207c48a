//! In-memory repository for projects and memberships.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{MemberId, Project, ProjectId, ProjectMember, UserId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<InMemoryProjectState>>,
}

#[derive(Debug, Default)]
struct InMemoryProjectState {
    projects: HashMap<ProjectId, Project>,
    members: HashMap<MemberId, ProjectMember>,
}

impl InMemoryProjectState {
    fn member_of(&self, project_id: ProjectId, user_id: UserId) -> Option<&ProjectMember> {
        self.members
            .values()
            .find(|member| member.project_id() == project_id && member.user_id() == user_id)
    }
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl ToString) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn create(
        &self,
        project: &Project,
        creator: &ProjectMember,
    ) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::DuplicateProject(project.id()));
        }
        state.projects.insert(project.id(), project.clone());
        state.members.insert(creator.id(), creator.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let stored = state
            .projects
            .get_mut(&project.id())
            .ok_or(ProjectRepositoryError::NotFound(project.id()))?;
        *stored = project.clone();
        Ok(())
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.projects.remove(&id).is_none() {
            return Err(ProjectRepositoryError::NotFound(id));
        }
        state.members.retain(|_, member| member.project_id() != id);
        Ok(())
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut projects: Vec<Project> = state
            .members
            .values()
            .filter(|member| member.user_id() == user_id)
            .filter_map(|member| state.projects.get(&member.project_id()).cloned())
            .collect();
        projects.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(projects)
    }

    async fn add_member(&self, member: &ProjectMember) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.projects.contains_key(&member.project_id()) {
            return Err(ProjectRepositoryError::NotFound(member.project_id()));
        }
        if state
            .member_of(member.project_id(), member.user_id())
            .is_some()
        {
            return Err(ProjectRepositoryError::DuplicateMember {
                project_id: member.project_id(),
                user_id: member.user_id(),
            });
        }
        state.members.insert(member.id(), member.clone());
        Ok(())
    }

    async fn find_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectRepositoryResult<Option<ProjectMember>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.member_of(project_id, user_id).cloned())
    }

    async fn find_member_by_id(
        &self,
        id: MemberId,
    ) -> ProjectRepositoryResult<Option<ProjectMember>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.members.get(&id).cloned())
    }

    async fn list_members(
        &self,
        project_id: ProjectId,
    ) -> ProjectRepositoryResult<Vec<ProjectMember>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut members: Vec<ProjectMember> = state
            .members
            .values()
            .filter(|member| member.project_id() == project_id)
            .cloned()
            .collect();
        members.sort_by_key(ProjectMember::joined_at);
        Ok(members)
    }

    async fn remove_member(&self, id: MemberId) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state
            .members
            .remove(&id)
            .map(|_| ())
            .ok_or(ProjectRepositoryError::MemberNotFound(id))
    }
}
