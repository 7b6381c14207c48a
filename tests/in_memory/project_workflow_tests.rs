//! Workflows spanning the project and task services.

use gorex::project::{
    domain::UserId,
    services::{CreateProjectRequest, InviteMemberRequest, ProjectServiceError},
};
use gorex::task::{
    domain::TaskStatus,
    ports::TaskRepository,
    services::{CreateTaskRequest, TaskServiceError, UpdateTaskRequest},
};
use eyre::ensure;
use rstest::rstest;

use super::helpers::{Stack, stack};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invited_member_can_take_and_finish_work(stack: Stack) -> eyre::Result<()> {
    let admin = UserId::new();
    let teammate = UserId::new();
    let project = stack
        .projects
        .create_project(admin, CreateProjectRequest::new("Launch"))
        .await?;
    stack
        .projects
        .invite_member(admin, project.id(), InviteMemberRequest::new(teammate))
        .await?;

    let task = stack
        .tasks
        .create_task(
            admin,
            project.id(),
            CreateTaskRequest::new("Write copy").with_assignee(teammate),
        )
        .await?;
    let finished = stack
        .tasks
        .transition_task(teammate, task.id(), TaskStatus::Done)
        .await?;

    ensure!(finished.status() == TaskStatus::Done);
    ensure!(finished.assignee_id() == Some(teammate));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removed_member_loses_access(stack: Stack) -> eyre::Result<()> {
    let admin = UserId::new();
    let teammate = UserId::new();
    let project = stack
        .projects
        .create_project(admin, CreateProjectRequest::new("Launch"))
        .await?;
    let membership = stack
        .projects
        .invite_member(admin, project.id(), InviteMemberRequest::new(teammate))
        .await?;
    let task = stack
        .tasks
        .create_task(teammate, project.id(), CreateTaskRequest::new("Draft"))
        .await?;

    stack
        .projects
        .remove_member(admin, project.id(), membership.id())
        .await?;

    let update = stack
        .tasks
        .update_task(teammate, task.id(), UpdateTaskRequest::new().with_title("Mine"))
        .await;
    ensure!(matches!(update, Err(TaskServiceError::Forbidden { .. })));
    let listing = stack.projects.list_member_projects(teammate).await?;
    ensure!(listing.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creator_cannot_be_removed(stack: Stack) -> eyre::Result<()> {
    let admin = UserId::new();
    let project = stack
        .projects
        .create_project(admin, CreateProjectRequest::new("Launch"))
        .await?;
    let members = stack.projects.list_members(admin, project.id()).await?;
    let creator = members
        .first()
        .ok_or_else(|| eyre::eyre!("creator membership missing"))?;

    let result = stack
        .projects
        .remove_member(admin, project.id(), creator.id())
        .await;

    ensure!(matches!(result, Err(ProjectServiceError::CannotRemoveAdmin(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_deletes_its_tasks(stack: Stack) -> eyre::Result<()> {
    let admin = UserId::new();
    let kept = stack
        .projects
        .create_project(admin, CreateProjectRequest::new("Kept"))
        .await?;
    let dropped = stack
        .projects
        .create_project(admin, CreateProjectRequest::new("Dropped"))
        .await?;
    let survivor = stack
        .tasks
        .create_task(admin, kept.id(), CreateTaskRequest::new("Stay"))
        .await?;
    let doomed = stack
        .tasks
        .create_task(admin, dropped.id(), CreateTaskRequest::new("Go"))
        .await?;

    stack.projects.delete_project(admin, dropped.id()).await?;

    ensure!(stack.task_repository.find_by_id(doomed.id()).await?.is_none());
    ensure!(stack.task_repository.find_by_id(survivor.id()).await?.is_some());
    let projects = stack.projects.list_member_projects(admin).await?;
    ensure!(projects.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dashboard_lists_newest_project_first(stack: Stack) -> eyre::Result<()> {
    let user = UserId::new();
    let older = stack
        .projects
        .create_project(user, CreateProjectRequest::new("Older"))
        .await?;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let newer = stack
        .projects
        .create_project(user, CreateProjectRequest::new("Newer"))
        .await?;

    let listed: Vec<_> = stack
        .projects
        .list_member_projects(user)
        .await?
        .iter()
        .map(gorex::project::domain::Project::id)
        .collect();

    ensure!(listed == vec![newer.id(), older.id()]);
    Ok(())
}
