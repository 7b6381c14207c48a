//! Unit tests for the board module.


use crate::project::domain::{ProjectId, UserId};
use crate::task::domain::{PersistedTaskData, Task, TaskId, TaskPriority, TaskStatus, TaskTitle};
use chrono::{DateTime, Utc};

/// Builds a stored task with a fixed status.
fn stored_task(title: &str, status: TaskStatus) -> Task {
    stored_task_with_deadline(title, status, None)
}

fn stored_task_with_deadline(
    title: &str,
    status: TaskStatus,
    deadline: Option<DateTime<Utc>>,
) -> Task {
    let now = Utc::now();
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        project_id: ProjectId::new(),
        creator_id: UserId::new(),
        title: TaskTitle::new(title).expect("test titles are non-empty"),
        description: None,
        status,
        priority: TaskPriority::Medium,
        assignee_id: None,
        deadline,
        created_at: now,
        updated_at: now,
    })
}

/// Returns a copy of `task` as the store would report it after a move.
fn with_status(task: &Task, status: TaskStatus) -> Task {
    let mut moved = task.clone();
    moved.assume_status(status);
    moved
}
