//! Domain model for tasks.
//!
//! Tasks belong to exactly one project. Status and priority are closed
//! enumerations; any status may follow any other.

mod error;
mod ids;
mod status;
mod task;
mod transition;

pub use error::{InvalidStatusError, ParseTaskPriorityError, TaskDomainError};
pub use ids::TaskId;
pub use status::{TaskPriority, TaskStatus};
pub use task::{NewTaskData, PersistedTaskData, Task, TaskPatch, TaskTitle};
pub use transition::{can_transition, can_transition_raw};
