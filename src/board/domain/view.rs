//! Column projection of a flat task list.

use crate::task::domain::{Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Tasks grouped into the four board columns.
///
/// All four columns are always present, possibly empty. Within a column,
/// tasks keep the order of the list they were projected from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BoardColumns<'a> {
    columns: BTreeMap<TaskStatus, Vec<&'a Task>>,
}

/// Groups `tasks` by status.
///
/// The result is re-derived from scratch on every call and is a stable
/// partition of the input: every task lands in exactly one column.
#[must_use]
pub fn project(tasks: &[Task]) -> BoardColumns<'_> {
    let mut columns: BTreeMap<TaskStatus, Vec<&Task>> = TaskStatus::ALL
        .into_iter()
        .map(|status| (status, Vec::new()))
        .collect();
    for task in tasks {
        columns.entry(task.status()).or_default().push(task);
    }
    BoardColumns { columns }
}

impl<'a> BoardColumns<'a> {
    /// Returns the tasks in one column, in input order.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[&'a Task] {
        self.columns.get(&status).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterates over the columns in board order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &[&'a Task])> {
        self.columns
            .iter()
            .map(|(status, tasks)| (*status, tasks.as_slice()))
    }

    /// Number of tasks per column.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<TaskStatus, usize> {
        self.columns
            .iter()
            .map(|(status, tasks)| (*status, tasks.len()))
            .collect()
    }

    /// Total number of tasks on the board.
    #[must_use]
    pub fn total(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    /// Number of open tasks whose deadline passed before `now`.
    #[must_use]
    pub fn overdue(&self, now: DateTime<Utc>) -> usize {
        self.columns
            .values()
            .flatten()
            .filter(|task| task.is_overdue(now))
            .count()
    }
}
