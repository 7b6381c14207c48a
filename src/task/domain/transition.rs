//! Status transition rules.
//!
//! The store accepts any status after any other; the only gate is project
//! membership of the acting user.

use super::{InvalidStatusError, TaskStatus};

/// Returns whether an actor may move a task from `current` to `requested`.
///
/// Membership is the sole condition. Board adjacency (see
/// [`TaskStatus::next`]) is presentational and plays no part here.
#[must_use]
pub const fn can_transition(
    _current: TaskStatus,
    _requested: TaskStatus,
    is_actor_project_member: bool,
) -> bool {
    is_actor_project_member
}

/// Textual variant of [`can_transition`] for untyped input.
///
/// # Errors
///
/// Returns [`InvalidStatusError`] when either status is not one of the four
/// board columns.
pub fn can_transition_raw(
    current: &str,
    requested: &str,
    is_actor_project_member: bool,
) -> Result<bool, InvalidStatusError> {
    let from = TaskStatus::try_from(current)?;
    let to = TaskStatus::try_from(requested)?;
    Ok(can_transition(from, to, is_actor_project_member))
}
