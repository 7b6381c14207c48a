//! `PostgreSQL` repository implementation for projects and memberships.

use super::{
    models::{ProjectMemberRow, ProjectRow},
    schema::{project_members, projects},
};
use crate::project::{
    domain::{
        MemberId, MemberRole, PersistedProjectData, Project, ProjectId, ProjectMember,
        ProjectName, ProjectStatus, UserId,
    },
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::task::adapters::postgres::GorexPgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: GorexPgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: GorexPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectRepositoryError::persistence)?
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn create(
        &self,
        project: &Project,
        creator: &ProjectMember,
    ) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let project_row = to_project_row(project);
        let member_row = to_member_row(creator);

        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                diesel::insert_into(projects::table)
                    .values(&project_row)
                    .execute(tx)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            ProjectRepositoryError::DuplicateProject(project_id)
                        }
                        _ => ProjectRepositoryError::persistence(err),
                    })?;
                diesel::insert_into(project_members::table)
                    .values(&member_row)
                    .execute(tx)
                    .map_err(ProjectRepositoryError::persistence)?;
                Ok(())
            })
        })
        .await
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let row = to_project_row(project);

        self.run_blocking(move |connection| {
            let affected =
                diesel::update(projects::table.filter(projects::id.eq(project_id.into_inner())))
                    .set((
                        projects::name.eq(row.name),
                        projects::description.eq(row.description),
                        projects::status.eq(row.status),
                        projects::updated_at.eq(row.updated_at),
                    ))
                    .execute(connection)
                    .map_err(ProjectRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ProjectRepositoryError::NotFound(project_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction(|tx| {
                diesel::delete(
                    project_members::table.filter(project_members::project_id.eq(id.into_inner())),
                )
                .execute(tx)
                .map_err(ProjectRepositoryError::persistence)?;
                let affected = diesel::delete(projects::table.filter(projects::id.eq(id.into_inner())))
                    .execute(tx)
                    .map_err(ProjectRepositoryError::persistence)?;
                if affected == 0 {
                    return Err(ProjectRepositoryError::NotFound(id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.into_inner()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn list_for_user(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let rows = projects::table
                .inner_join(project_members::table)
                .filter(project_members::user_id.eq(user_id.into_inner()))
                .order(projects::created_at.desc())
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }

    async fn add_member(&self, member: &ProjectMember) -> ProjectRepositoryResult<()> {
        let project_id = member.project_id();
        let user_id = member.user_id();
        let row = to_member_row(member);

        self.run_blocking(move |connection| {
            diesel::insert_into(project_members::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicateMember {
                            project_id,
                            user_id,
                        }
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        ProjectRepositoryError::NotFound(project_id)
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectRepositoryResult<Option<ProjectMember>> {
        self.run_blocking(move |connection| {
            let row = project_members::table
                .filter(project_members::project_id.eq(project_id.into_inner()))
                .filter(project_members::user_id.eq(user_id.into_inner()))
                .select(ProjectMemberRow::as_select())
                .first::<ProjectMemberRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_member).transpose()
        })
        .await
    }

    async fn find_member_by_id(
        &self,
        id: MemberId,
    ) -> ProjectRepositoryResult<Option<ProjectMember>> {
        self.run_blocking(move |connection| {
            let row = project_members::table
                .filter(project_members::id.eq(id.into_inner()))
                .select(ProjectMemberRow::as_select())
                .first::<ProjectMemberRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_member).transpose()
        })
        .await
    }

    async fn list_members(
        &self,
        project_id: ProjectId,
    ) -> ProjectRepositoryResult<Vec<ProjectMember>> {
        self.run_blocking(move |connection| {
            let rows = project_members::table
                .filter(project_members::project_id.eq(project_id.into_inner()))
                .order(project_members::joined_at.asc())
                .select(ProjectMemberRow::as_select())
                .load::<ProjectMemberRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            rows.into_iter().map(row_to_member).collect()
        })
        .await
    }

    async fn remove_member(&self, id: MemberId) -> ProjectRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected =
                diesel::delete(project_members::table.filter(project_members::id.eq(id.into_inner())))
                    .execute(connection)
                    .map_err(ProjectRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ProjectRepositoryError::MemberNotFound(id));
            }
            Ok(())
        })
        .await
    }
}

impl From<DieselError> for ProjectRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

fn to_project_row(project: &Project) -> ProjectRow {
    ProjectRow {
        id: project.id().into_inner(),
        name: project.name().as_str().to_owned(),
        description: project.description().map(str::to_owned),
        status: project.status().as_str().to_owned(),
        creator_id: project.creator_id().into_inner(),
        created_at: project.created_at(),
        updated_at: project.updated_at(),
    }
}

fn to_member_row(member: &ProjectMember) -> ProjectMemberRow {
    ProjectMemberRow {
        id: member.id().into_inner(),
        project_id: member.project_id().into_inner(),
        user_id: member.user_id().into_inner(),
        role: member.role().as_str().to_owned(),
        joined_at: member.joined_at(),
    }
}

fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<Project> {
    let name = ProjectName::new(row.name).map_err(ProjectRepositoryError::persistence)?;
    let status =
        ProjectStatus::try_from(row.status.as_str()).map_err(ProjectRepositoryError::persistence)?;
    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        name,
        description: row.description,
        status,
        creator_id: UserId::from_uuid(row.creator_id),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn row_to_member(row: ProjectMemberRow) -> ProjectRepositoryResult<ProjectMember> {
    let role = MemberRole::try_from(row.role.as_str()).map_err(ProjectRepositoryError::persistence)?;
    Ok(ProjectMember::from_persisted(
        MemberId::from_uuid(row.id),
        ProjectId::from_uuid(row.project_id),
        UserId::from_uuid(row.user_id),
        role,
        row.joined_at,
    ))
}
