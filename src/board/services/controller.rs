//! Drives optimistic status changes against a [`TaskStatusGateway`].

use crate::board::{
    domain::{
        BoardColumns, BoardIntent, OptimisticBoard, PendingTransition, RequestId, Settlement,
        TransitionDispatch, project,
    },
    ports::{GatewayError, GatewayResult, TaskStatusGateway},
};
use crate::failure::FailureCause;
use crate::task::domain::{Task, TaskId, TaskStatus};
use futures_util::{
    StreamExt,
    future::BoxFuture,
    stream::FuturesUnordered,
};
use std::sync::Arc;

struct SettledTransition {
    pending: PendingTransition,
    outcome: GatewayResult<Task>,
}

/// Owns a board's task list and keeps it in step with the store.
///
/// Status changes are visible as soon as [`request_transition`] returns, and
/// the store call is already running on the Tokio runtime by then. Verdicts
/// reach the board only when the caller polls with [`settle_next`] or
/// [`drain`], in whatever order they complete.
///
/// [`request_transition`]: Self::request_transition
/// [`settle_next`]: Self::settle_next
/// [`drain`]: Self::drain
pub struct BoardSyncController<G>
where
    G: TaskStatusGateway + 'static,
{
    board: OptimisticBoard,
    gateway: Arc<G>,
    in_flight: FuturesUnordered<BoxFuture<'static, SettledTransition>>,
}

impl<G> BoardSyncController<G>
where
    G: TaskStatusGateway + 'static,
{
    /// Creates a controller for `board`.
    #[must_use]
    pub fn new(board: OptimisticBoard, gateway: Arc<G>) -> Self {
        Self {
            board,
            gateway,
            in_flight: FuturesUnordered::new(),
        }
    }

    /// Current board state, optimistic changes included.
    #[must_use]
    pub const fn board(&self) -> &OptimisticBoard {
        &self.board
    }

    /// Column projection of the current board state.
    #[must_use]
    pub fn columns(&self) -> BoardColumns<'_> {
        project(self.board.tasks())
    }

    /// Number of store requests that have not produced an outcome yet.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.in_flight.len()
    }

    /// Moves a task and sends the change to the store.
    ///
    /// Only an [`TransitionDispatch::Applied`] result issues a store request,
    /// spawned at once. Must be called from within a Tokio runtime.
    pub fn request_transition(
        &mut self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> TransitionDispatch {
        let dispatch = self.board.begin_transition(task_id, status);
        if let TransitionDispatch::Applied(pending) = dispatch {
            let gateway = Arc::clone(&self.gateway);
            let call = tokio::spawn(async move {
                gateway
                    .persist_status(pending.task_id, pending.requested_status)
                    .await
            });
            self.in_flight.push(Box::pin(async move {
                let outcome = call.await.unwrap_or_else(|err| {
                    Err(GatewayError::new(FailureCause::NetworkFailure, err.to_string()))
                });
                SettledTransition { pending, outcome }
            }));
        }
        dispatch
    }

    /// Applies a list mutation to the board.
    pub fn apply(&mut self, intent: BoardIntent) {
        self.board.apply(intent);
    }

    /// Waits for the next store verdict and applies it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn settle_next(&mut self) -> Option<(RequestId, Settlement)> {
        let settled = self.in_flight.next().await?;
        Some(self.record(settled))
    }

    /// Waits for every in-flight request and applies the verdicts.
    pub async fn drain(&mut self) -> Vec<(RequestId, Settlement)> {
        let mut settlements = Vec::with_capacity(self.in_flight.len());
        while let Some(settlement) = self.settle_next().await {
            settlements.push(settlement);
        }
        settlements
    }

    fn record(&mut self, settled: SettledTransition) -> (RequestId, Settlement) {
        let SettledTransition { pending, outcome } = settled;
        let request_id = pending.request_id;
        let settlement = self.board.settle(
            request_id,
            outcome
                .map(|task| task.status())
                .map_err(|err| err.cause()),
        );
        match settlement {
            Settlement::Reverted { restored, cause } => tracing::debug!(
                task_id = %pending.task_id,
                %request_id,
                %cause,
                restored = restored.as_str(),
                "reverted optimistic status"
            ),
            Settlement::Superseded { cause } => tracing::debug!(
                task_id = %pending.task_id,
                %request_id,
                %cause,
                "status change failed behind a newer one"
            ),
            Settlement::Confirmed | Settlement::Orphaned | Settlement::Stale => {}
        }
        (request_id, settlement)
    }
}
