//! Route table and request handlers.

use super::{Actor, ApiError, ApiJson, ApiPath, ApiQuery, AppState};
use crate::board::domain::project;
use crate::project::{
    domain::{MemberId, Project, ProjectId, UserId},
    ports::ProjectRepository,
    services::{CreateProjectRequest, InviteMemberRequest},
};
use crate::task::{
    domain::{TaskId, TaskStatus},
    ports::TaskRepository,
    services::{CreateTaskRequest, UpdateTaskRequest},
};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

type Shared<T, P, C> = State<Arc<AppState<T, P, C>>>;
type ApiResult<T> = Result<T, ApiError>;

/// Builds the API router over `state`.
#[must_use]
pub fn router<T, P, C>(state: Arc<AppState<T, P, C>>) -> Router
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/dashboard/projects", get(dashboard::<T, P, C>))
        .route("/api/projects", post(create_project::<T, P, C>))
        .route("/api/projects/{project_id}", delete(delete_project::<T, P, C>))
        .route(
            "/api/projects/{project_id}/status",
            put(update_project_status::<T, P, C>),
        )
        .route(
            "/api/projects/{project_id}/members",
            get(list_members::<T, P, C>)
                .post(invite_member::<T, P, C>)
                .delete(remove_member::<T, P, C>),
        )
        .route(
            "/api/projects/{project_id}/tasks",
            get(list_tasks::<T, P, C>).post(create_task::<T, P, C>),
        )
        .route("/api/projects/{project_id}/board", get(board::<T, P, C>))
        .route(
            "/api/tasks/{task_id}",
            put(update_task::<T, P, C>).delete(delete_task::<T, P, C>),
        )
        .with_state(state)
}

#[expect(clippy::unused_async, reason = "axum handlers are async")]
async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct DashboardProject {
    #[serde(flatten)]
    project: Project,
    task_counts: BTreeMap<TaskStatus, usize>,
    total_tasks: usize,
    overdue_tasks: usize,
}

async fn dashboard<T, P, C>(
    State(state): Shared<T, P, C>,
    Actor(actor): Actor,
) -> ApiResult<Json<Vec<DashboardProject>>>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let now = state.clock.utc();
    let projects = state.projects.list_member_projects(actor).await?;
    let mut cards = Vec::with_capacity(projects.len());
    for listed in projects {
        let tasks = state.tasks.list_project_tasks(actor, listed.id()).await?;
        let columns = project(&tasks);
        cards.push(DashboardProject {
            task_counts: columns.counts(),
            total_tasks: columns.total(),
            overdue_tasks: columns.overdue(now),
            project: listed,
        });
    }
    Ok(Json(cards))
}

#[derive(Debug, Deserialize)]
struct CreateProjectBody {
    #[serde(default)]
    name: String,
    description: Option<String>,
}

async fn create_project<T, P, C>(
    State(state): Shared<T, P, C>,
    Actor(actor): Actor,
    ApiJson(body): ApiJson<CreateProjectBody>,
) -> ApiResult<(StatusCode, Json<Project>)>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let mut request = CreateProjectRequest::new(body.name);
    if let Some(description) = body.description {
        request = request.with_description(description);
    }
    let created = state.projects.create_project(actor, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_project<T, P, C>(
    State(state): Shared<T, P, C>,
    Actor(actor): Actor,
    ApiPath(project_id): ApiPath<Uuid>,
) -> ApiResult<StatusCode>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    state
        .projects
        .delete_project(actor, ProjectId::from_uuid(project_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct ProjectStatusBody {
    #[serde(default)]
    status: String,
}

async fn update_project_status<T, P, C>(
    State(state): Shared<T, P, C>,
    Actor(actor): Actor,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<ProjectStatusBody>,
) -> ApiResult<Json<Project>>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let updated = state
        .projects
        .update_status(actor, ProjectId::from_uuid(project_id), &body.status)
        .await?;
    Ok(Json(updated))
}

async fn list_members<T, P, C>(
    State(state): Shared<T, P, C>,
    Actor(actor): Actor,
    ApiPath(project_id): ApiPath<Uuid>,
) -> ApiResult<Response>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let members = state
        .projects
        .list_members(actor, ProjectId::from_uuid(project_id))
        .await?;
    Ok(Json(members).into_response())
}

#[derive(Debug, Deserialize)]
struct InviteBody {
    user_id: Uuid,
    role: Option<String>,
}

async fn invite_member<T, P, C>(
    State(state): Shared<T, P, C>,
    Actor(actor): Actor,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<InviteBody>,
) -> ApiResult<Response>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let mut request = InviteMemberRequest::new(UserId::from_uuid(body.user_id));
    if let Some(role) = body.role {
        request = request.with_role(role);
    }
    let member = state
        .projects
        .invite_member(actor, ProjectId::from_uuid(project_id), request)
        .await?;
    Ok((StatusCode::CREATED, Json(member)).into_response())
}

#[derive(Debug, Deserialize)]
struct RemoveMemberQuery {
    #[serde(rename = "memberId")]
    member_id: Option<Uuid>,
}

async fn remove_member<T, P, C>(
    State(state): Shared<T, P, C>,
    Actor(actor): Actor,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<RemoveMemberQuery>,
) -> ApiResult<StatusCode>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let member_id = query
        .member_id
        .ok_or_else(|| ApiError::bad_request("memberId is required"))?;
    state
        .projects
        .remove_member(
            actor,
            ProjectId::from_uuid(project_id),
            MemberId::from_uuid(member_id),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_tasks<T, P, C>(
    State(state): Shared<T, P, C>,
    Actor(actor): Actor,
    ApiPath(project_id): ApiPath<Uuid>,
) -> ApiResult<Response>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let tasks = state
        .tasks
        .list_project_tasks(actor, ProjectId::from_uuid(project_id))
        .await?;
    Ok(Json(tasks).into_response())
}

#[derive(Debug, Deserialize)]
struct CreateTaskBody {
    #[serde(default)]
    title: String,
    description: Option<String>,
    priority: Option<String>,
    assignee_id: Option<Uuid>,
    deadline: Option<DateTime<Utc>>,
}

impl From<CreateTaskBody> for CreateTaskRequest {
    fn from(body: CreateTaskBody) -> Self {
        let mut request = Self::new(body.title);
        if let Some(description) = body.description {
            request = request.with_description(description);
        }
        if let Some(priority) = body.priority {
            request = request.with_priority(priority);
        }
        if let Some(assignee) = body.assignee_id {
            request = request.with_assignee(UserId::from_uuid(assignee));
        }
        if let Some(deadline) = body.deadline {
            request = request.with_deadline(deadline);
        }
        request
    }
}

async fn create_task<T, P, C>(
    State(state): Shared<T, P, C>,
    Actor(actor): Actor,
    ApiPath(project_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<CreateTaskBody>,
) -> ApiResult<Response>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task = state
        .tasks
        .create_task(actor, ProjectId::from_uuid(project_id), body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(task)).into_response())
}

async fn board<T, P, C>(
    State(state): Shared<T, P, C>,
    Actor(actor): Actor,
    ApiPath(project_id): ApiPath<Uuid>,
) -> ApiResult<Response>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let tasks = state
        .tasks
        .list_project_tasks(actor, ProjectId::from_uuid(project_id))
        .await?;
    Ok(Json(project(&tasks)).into_response())
}

/// Distinguishes an absent field from an explicit `null`.
fn explicit_null<'de, D, V>(deserializer: D) -> Result<Option<Option<V>>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    Option::<V>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
struct UpdateTaskBody {
    title: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    description: Option<Option<String>>,
    status: Option<String>,
    priority: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    assignee_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "explicit_null")]
    deadline: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateTaskBody> for UpdateTaskRequest {
    fn from(body: UpdateTaskBody) -> Self {
        let mut request = Self::new();
        if let Some(title) = body.title {
            request = request.with_title(title);
        }
        if let Some(description) = body.description {
            request = request.with_description(description);
        }
        if let Some(status) = body.status {
            request = request.with_status(status);
        }
        if let Some(priority) = body.priority {
            request = request.with_priority(priority);
        }
        if let Some(assignee) = body.assignee_id {
            request = request.with_assignee(assignee.map(UserId::from_uuid));
        }
        if let Some(deadline) = body.deadline {
            request = request.with_deadline(deadline);
        }
        request
    }
}

async fn update_task<T, P, C>(
    State(state): Shared<T, P, C>,
    Actor(actor): Actor,
    ApiPath(task_id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateTaskBody>,
) -> ApiResult<Response>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let task = state
        .tasks
        .update_task(actor, TaskId::from_uuid(task_id), body.into())
        .await?;
    Ok(Json(task).into_response())
}

async fn delete_task<T, P, C>(
    State(state): Shared<T, P, C>,
    Actor(actor): Actor,
    ApiPath(task_id): ApiPath<Uuid>,
) -> ApiResult<StatusCode>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    state
        .tasks
        .delete_task(actor, TaskId::from_uuid(task_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
