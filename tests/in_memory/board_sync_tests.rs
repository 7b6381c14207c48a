//! Board controller driven against the real task service.

use std::sync::Arc;

use gorex::board::{
    adapters::ServiceGateway,
    domain::{BoardIntent, OptimisticBoard, Settlement, TransitionDispatch},
    services::BoardSyncController,
};
use gorex::failure::FailureCause;
use gorex::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{ProjectId, UserId},
    services::{CreateProjectRequest, InviteMemberRequest},
};
use gorex::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskStatus},
    services::CreateTaskRequest,
};
use eyre::{ensure, eyre};
use mockable::DefaultClock;
use rstest::rstest;

use super::helpers::{Stack, stack};

type Controller = BoardSyncController<
    ServiceGateway<InMemoryTaskRepository, InMemoryProjectRepository, DefaultClock>,
>;

struct Board {
    project_id: ProjectId,
    task: Task,
}

async fn seed(stack: &Stack, admin: UserId) -> eyre::Result<Board> {
    let project = stack
        .projects
        .create_project(admin, CreateProjectRequest::new("Board"))
        .await?;
    let task = stack
        .tasks
        .create_task(admin, project.id(), CreateTaskRequest::new("Move me"))
        .await?;
    Ok(Board {
        project_id: project.id(),
        task,
    })
}

async fn controller_for(stack: &Stack, board: &Board, actor: UserId) -> eyre::Result<Controller> {
    let tasks = stack.tasks.list_project_tasks(actor, board.project_id).await?;
    let gateway = ServiceGateway::new(stack.tasks.clone(), actor);
    Ok(BoardSyncController::new(
        OptimisticBoard::new(tasks, true),
        Arc::new(gateway),
    ))
}

fn status_of(controller: &Controller, task: &Task) -> eyre::Result<TaskStatus> {
    controller
        .board()
        .task(task.id())
        .map(Task::status)
        .ok_or_else(|| eyre!("task missing from board"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn member_move_is_confirmed_and_stored(stack: Stack) -> eyre::Result<()> {
    let admin = UserId::new();
    let board = seed(&stack, admin).await?;
    let mut controller = controller_for(&stack, &board, admin).await?;

    let dispatch = controller.request_transition(board.task.id(), TaskStatus::Review);
    ensure!(matches!(dispatch, TransitionDispatch::Applied(_)));
    ensure!(status_of(&controller, &board.task)? == TaskStatus::Review);

    let settlements = controller.drain().await;
    ensure!(matches!(settlements.as_slice(), [(_, Settlement::Confirmed)]));

    let stored = stack.tasks.list_project_tasks(admin, board.project_id).await?;
    ensure!(stored.first().map(Task::status) == Some(TaskStatus::Review));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn move_by_removed_member_rolls_back(stack: Stack) -> eyre::Result<()> {
    let admin = UserId::new();
    let teammate = UserId::new();
    let board = seed(&stack, admin).await?;
    let membership = stack
        .projects
        .invite_member(admin, board.project_id, InviteMemberRequest::new(teammate))
        .await?;
    let mut controller = controller_for(&stack, &board, teammate).await?;
    stack
        .projects
        .remove_member(admin, board.project_id, membership.id())
        .await?;

    controller.request_transition(board.task.id(), TaskStatus::Done);
    let settlements = controller.drain().await;

    ensure!(matches!(
        settlements.as_slice(),
        [(
            _,
            Settlement::Reverted {
                restored: TaskStatus::Todo,
                cause: FailureCause::Forbidden,
            }
        )]
    ));
    ensure!(status_of(&controller, &board.task)? == TaskStatus::Todo);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn move_of_deleted_task_reports_not_found(stack: Stack) -> eyre::Result<()> {
    let admin = UserId::new();
    let board = seed(&stack, admin).await?;
    let mut controller = controller_for(&stack, &board, admin).await?;
    stack.tasks.delete_task(admin, board.task.id()).await?;

    controller.request_transition(board.task.id(), TaskStatus::InProgress);
    let settlements = controller.drain().await;

    ensure!(matches!(
        settlements.as_slice(),
        [(
            _,
            Settlement::Reverted {
                cause: FailureCause::NotFound,
                ..
            }
        )]
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_move_of_task_removed_locally_is_orphaned(stack: Stack) -> eyre::Result<()> {
    let admin = UserId::new();
    let board = seed(&stack, admin).await?;
    let mut controller = controller_for(&stack, &board, admin).await?;
    stack.tasks.delete_task(admin, board.task.id()).await?;

    controller.request_transition(board.task.id(), TaskStatus::Done);
    controller.apply(BoardIntent::Remove(board.task.id()));
    let settlements = controller.drain().await;

    ensure!(matches!(settlements.as_slice(), [(_, Settlement::Orphaned)]));
    ensure!(controller.columns().total() == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn consecutive_moves_settle_on_the_last_one(stack: Stack) -> eyre::Result<()> {
    let admin = UserId::new();
    let board = seed(&stack, admin).await?;
    let mut controller = controller_for(&stack, &board, admin).await?;

    controller.request_transition(board.task.id(), TaskStatus::InProgress);
    controller.request_transition(board.task.id(), TaskStatus::Done);
    controller.drain().await;

    ensure!(controller.board().is_settled());
    ensure!(controller.columns().column(TaskStatus::Done).len() == 1);
    Ok(())
}
