//! Client-side board state with optimistic status changes.
//!
//! [`OptimisticBoard`] owns the task list shown on a board and records, for
//! every status change it has applied but the store has not yet confirmed,
//! the status the task had just before that change. Outcomes may arrive in
//! any order; a failed request only rolls the task back when no newer
//! request for the same task is in flight or confirmed.

use crate::failure::FailureCause;
use crate::task::domain::{Task, TaskId, TaskStatus, can_transition};
use std::collections::{BTreeSet, HashMap};
use std::ops::Bound;
use std::fmt;

/// Identifier of one in-flight status change.
///
/// Identifiers grow monotonically per board, so a larger value is a newer
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Returns the raw sequence number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Status change applied locally and awaiting the store's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransition {
    /// Request this entry belongs to.
    pub request_id: RequestId,
    /// Task being moved.
    pub task_id: TaskId,
    /// Status to restore if this request fails.
    pub previous_status: TaskStatus,
    /// Status applied optimistically.
    pub requested_status: TaskStatus,
}

/// Result of asking the board to move a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDispatch {
    /// The change is visible and must be sent to the store under this id.
    Applied(PendingTransition),
    /// The task already has the requested status; nothing to send.
    Unchanged,
    /// The task is not on this board.
    UnknownTask,
    /// The acting user may not move tasks on this board.
    Denied,
}

/// What settling a request did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The store confirmed the requested status.
    Confirmed,
    /// The request failed and the task was rolled back to `restored`.
    Reverted {
        /// Status the task shows again.
        restored: TaskStatus,
        /// Why the store refused.
        cause: FailureCause,
    },
    /// The request failed but a newer change to the same task is still in
    /// flight or already confirmed; the visible status is left to it.
    Superseded {
        /// Why the store refused.
        cause: FailureCause,
    },
    /// The task was removed from the board while the request was in flight.
    Orphaned,
    /// No request with this id is in flight.
    Stale,
}

/// Mutation applied to the board's task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardIntent {
    /// Append a newly created task.
    Insert(Task),
    /// Replace a task with a fresher copy, for example after an edit.
    Replace(Task),
    /// Drop a deleted task.
    Remove(TaskId),
    /// Swap in the task list from a fresh load of the board.
    MergeRefetch(Vec<Task>),
}

/// Board task list owned by one client, with its in-flight table.
#[derive(Debug, Clone, Default)]
pub struct OptimisticBoard {
    tasks: Vec<Task>,
    in_flight: HashMap<RequestId, PendingTransition>,
    confirmed: HashMap<TaskId, BTreeSet<RequestId>>,
    next_request: u64,
    actor_is_member: bool,
}

impl OptimisticBoard {
    /// Creates a board showing `tasks` to an actor.
    #[must_use]
    pub fn new(tasks: Vec<Task>, actor_is_member: bool) -> Self {
        Self {
            tasks,
            in_flight: HashMap::new(),
            confirmed: HashMap::new(),
            next_request: 0,
            actor_is_member,
        }
    }

    /// Tasks in display order, with optimistic statuses applied.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task on the board.
    #[must_use]
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == task_id)
    }

    /// Requests awaiting an outcome, oldest first.
    #[must_use]
    pub fn in_flight(&self) -> Vec<PendingTransition> {
        let mut pending: Vec<PendingTransition> = self.in_flight.values().copied().collect();
        pending.sort_by_key(|entry| entry.request_id);
        pending
    }

    /// Returns whether any request is awaiting an outcome.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Moves a task locally and records the change as in flight.
    ///
    /// Nothing is recorded when the task is missing, already has `requested`,
    /// or the actor may not move it.
    pub fn begin_transition(&mut self, task_id: TaskId, requested: TaskStatus) -> TransitionDispatch {
        let actor_is_member = self.actor_is_member;
        let Some(task) = self.tasks.iter_mut().find(|task| task.id() == task_id) else {
            return TransitionDispatch::UnknownTask;
        };
        let current = task.status();
        if current == requested {
            return TransitionDispatch::Unchanged;
        }
        if !can_transition(current, requested, actor_is_member) {
            return TransitionDispatch::Denied;
        }

        task.assume_status(requested);
        self.next_request += 1;
        let pending = PendingTransition {
            request_id: RequestId(self.next_request),
            task_id,
            previous_status: current,
            requested_status: requested,
        };
        self.in_flight.insert(pending.request_id, pending);
        TransitionDispatch::Applied(pending)
    }

    /// Applies the store's verdict for one request.
    ///
    /// `outcome` carries the status the store reports on success. A success
    /// reporting any status other than the requested one counts as a failure.
    pub fn settle(
        &mut self,
        request_id: RequestId,
        outcome: Result<TaskStatus, FailureCause>,
    ) -> Settlement {
        let Some(pending) = self.in_flight.remove(&request_id) else {
            return Settlement::Stale;
        };
        let task_id = pending.task_id;
        let settlement = match outcome {
            Ok(status) if status == pending.requested_status => {
                self.confirmed.entry(task_id).or_default().insert(request_id);
                Settlement::Confirmed
            }
            Ok(_) => self.roll_back(&pending, FailureCause::Server),
            Err(cause) => self.roll_back(&pending, cause),
        };
        if !self.in_flight.values().any(|entry| entry.task_id == task_id) {
            self.confirmed.remove(&task_id);
        }
        settlement
    }

    fn roll_back(&mut self, failed: &PendingTransition, cause: FailureCause) -> Settlement {
        let newer_in_flight = self.in_flight.values().any(|entry| {
            entry.task_id == failed.task_id && entry.request_id > failed.request_id
        });
        let newer_confirmed = self.confirmed.get(&failed.task_id).is_some_and(|ids| {
            ids.range((Bound::Excluded(failed.request_id), Bound::Unbounded))
                .next()
                .is_some()
        });

        // Each request restores only its own previous status, and only while
        // no newer change to the task owns the visible status.
        if newer_in_flight || newer_confirmed {
            return Settlement::Superseded { cause };
        }

        match self.tasks.iter_mut().find(|task| task.id() == failed.task_id) {
            Some(task) => {
                task.assume_status(failed.previous_status);
                Settlement::Reverted {
                    restored: failed.previous_status,
                    cause,
                }
            }
            None => Settlement::Orphaned,
        }
    }

    /// Applies a list mutation.
    ///
    /// Fresh copies of tasks with changes still in flight keep the newest
    /// optimistic status so confirmations do not flicker the board.
    pub fn apply(&mut self, intent: BoardIntent) {
        match intent {
            BoardIntent::Insert(task) => {
                if self.task(task.id()).is_none() {
                    self.tasks.push(task);
                }
            }
            BoardIntent::Replace(mut task) => {
                self.overlay_pending(&mut task);
                if let Some(slot) = self.tasks.iter_mut().find(|slot| slot.id() == task.id()) {
                    *slot = task;
                }
            }
            BoardIntent::Remove(task_id) => {
                self.tasks.retain(|task| task.id() != task_id);
            }
            BoardIntent::MergeRefetch(mut tasks) => {
                for task in &mut tasks {
                    self.overlay_pending(task);
                }
                self.tasks = tasks;
            }
        }
    }

    fn overlay_pending(&self, task: &mut Task) {
        let latest = self
            .in_flight
            .values()
            .filter(|entry| entry.task_id == task.id())
            .max_by_key(|entry| entry.request_id);
        if let Some(entry) = latest {
            task.assume_status(entry.requested_status);
        }
    }
}
