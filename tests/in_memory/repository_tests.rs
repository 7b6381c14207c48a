//! Contract tests for the in-memory repositories.

use gorex::project::{
    domain::{MemberRole, Project, ProjectMember, ProjectName, UserId},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use gorex::task::{
    domain::{NewTaskData, Task, TaskPriority, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::rstest;

use super::helpers::{Stack, stack};

fn new_project(creator: UserId) -> eyre::Result<(Project, ProjectMember)> {
    let project = Project::new(ProjectName::new("Repo")?, None, creator, &DefaultClock);
    let admin = ProjectMember::new(project.id(), creator, MemberRole::Admin, &DefaultClock);
    Ok((project, admin))
}

fn new_task(project: &Project, title: &str) -> eyre::Result<Task> {
    Ok(Task::new(
        NewTaskData {
            project_id: project.id(),
            creator_id: project.creator_id(),
            title: TaskTitle::new(title)?,
            description: None,
            priority: TaskPriority::Medium,
            assignee_id: None,
            deadline: None,
        },
        &DefaultClock,
    ))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_membership_is_rejected(stack: Stack) -> eyre::Result<()> {
    let creator = UserId::new();
    let (project, admin) = new_project(creator)?;
    stack.project_repository.create(&project, &admin).await?;

    let again = ProjectMember::new(project.id(), creator, MemberRole::Member, &DefaultClock);
    let result = stack.project_repository.add_member(&again).await;

    ensure!(matches!(
        result,
        Err(ProjectRepositoryError::DuplicateMember { user_id, .. }) if user_id == creator
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn members_list_in_join_order(stack: Stack) -> eyre::Result<()> {
    let creator = UserId::new();
    let (project, admin) = new_project(creator)?;
    stack.project_repository.create(&project, &admin).await?;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let joined = ProjectMember::new(project.id(), UserId::new(), MemberRole::Member, &DefaultClock);
    stack.project_repository.add_member(&joined).await?;

    let members = stack.project_repository.list_members(project.id()).await?;
    let ids: Vec<_> = members.iter().map(ProjectMember::id).collect();

    ensure!(ids == vec![admin.id(), joined.id()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_task_is_rejected(stack: Stack) -> eyre::Result<()> {
    let (project, admin) = new_project(UserId::new())?;
    stack.project_repository.create(&project, &admin).await?;
    let task = new_task(&project, "once")?;
    stack.task_repository.store(&task).await?;

    let result = stack.task_repository.store(&task).await;

    ensure!(matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_by_project_reports_removed_count(stack: Stack) -> eyre::Result<()> {
    let (project, admin) = new_project(UserId::new())?;
    stack.project_repository.create(&project, &admin).await?;
    stack.task_repository.store(&new_task(&project, "a")?).await?;
    stack.task_repository.store(&new_task(&project, "b")?).await?;

    let removed = stack.task_repository.delete_by_project(project.id()).await?;

    ensure!(removed == 2);
    ensure!(stack.task_repository.list_by_project(project.id()).await?.is_empty());
    Ok(())
}
