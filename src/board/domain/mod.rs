//! Board state: column projection and optimistic task list.

mod optimistic;
mod view;

pub use optimistic::{
    BoardIntent, OptimisticBoard, PendingTransition, RequestId, Settlement, TransitionDispatch,
};
pub use view::{BoardColumns, project};
