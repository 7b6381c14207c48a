//! Shared world state for board synchronisation BDD scenarios.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use gorex::board::{
    domain::{OptimisticBoard, RequestId, Settlement, TransitionDispatch},
    ports::{GatewayError, GatewayResult, TaskStatusGateway},
    services::BoardSyncController,
};
use gorex::failure::FailureCause;
use gorex::project::domain::{ProjectId, UserId};
use gorex::task::domain::{NewTaskData, Task, TaskId, TaskPriority, TaskStatus, TaskTitle};
use mockable::DefaultClock;
use rstest::fixture;
use tokio::sync::oneshot;

/// Server answer for one scripted move.
pub type Reply = Result<TaskStatus, FailureCause>;

/// Gateway whose answers are released one at a time by the scenario.
#[derive(Default)]
pub struct ScriptedGateway {
    tasks: Mutex<HashMap<TaskId, Task>>,
    replies: Mutex<HashMap<TaskStatus, oneshot::Receiver<Reply>>>,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    /// Registers a task the gateway can echo back on success.
    pub fn track(&self, task: &Task) -> eyre::Result<()> {
        self.tasks
            .lock()
            .map_err(|err| eyre::eyre!("gateway tasks lock poisoned: {err}"))?
            .insert(task.id(), task.clone());
        Ok(())
    }

    /// Prepares the reply slot for a move to `status`.
    pub fn expect_move(&self, status: TaskStatus) -> eyre::Result<oneshot::Sender<Reply>> {
        let (sender, receiver) = oneshot::channel();
        self.replies
            .lock()
            .map_err(|err| eyre::eyre!("gateway replies lock poisoned: {err}"))?
            .insert(status, receiver);
        Ok(sender)
    }

    /// Drops the reply slot for a move that was never sent.
    pub fn forget_move(&self, status: TaskStatus) -> eyre::Result<()> {
        self.replies
            .lock()
            .map_err(|err| eyre::eyre!("gateway replies lock poisoned: {err}"))?
            .remove(&status);
        Ok(())
    }

    /// Number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn unavailable(message: &str) -> GatewayError {
    GatewayError::new(FailureCause::NetworkFailure, message)
}

#[async_trait]
impl TaskStatusGateway for ScriptedGateway {
    async fn persist_status(&self, task_id: TaskId, status: TaskStatus) -> GatewayResult<Task> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let receiver = self
            .replies
            .lock()
            .map_err(|_| unavailable("replies lock poisoned"))?
            .remove(&status)
            .ok_or_else(|| unavailable("no reply scripted"))?;
        let reply = receiver
            .await
            .map_err(|_| unavailable("reply dropped"))?;
        let stored_status =
            reply.map_err(|cause| GatewayError::new(cause, "scripted refusal"))?;
        let mut task = self
            .tasks
            .lock()
            .map_err(|_| unavailable("tasks lock poisoned"))?
            .get(&task_id)
            .cloned()
            .ok_or_else(|| GatewayError::new(FailureCause::NotFound, "unknown task"))?;
        task.assume_status(stored_status);
        Ok(task)
    }
}

/// Scenario world for board synchronisation behaviour tests.
pub struct BoardSyncWorld {
    pub project_id: ProjectId,
    pub viewer: UserId,
    pub gateway: Arc<ScriptedGateway>,
    pub controller: BoardSyncController<ScriptedGateway>,
    pub titles: HashMap<String, TaskId>,
    pub replies: HashMap<TaskStatus, oneshot::Sender<Reply>>,
    pub last_dispatch: Option<TransitionDispatch>,
    pub last_settlement: Option<(RequestId, Settlement)>,
}

impl BoardSyncWorld {
    /// Creates a world with an empty board viewed by a project member.
    #[must_use]
    pub fn new() -> Self {
        let gateway = Arc::new(ScriptedGateway::default());
        Self {
            project_id: ProjectId::new(),
            viewer: UserId::new(),
            controller: BoardSyncController::new(
                OptimisticBoard::new(Vec::new(), true),
                Arc::clone(&gateway),
            ),
            gateway,
            titles: HashMap::new(),
            replies: HashMap::new(),
            last_dispatch: None,
            last_settlement: None,
        }
    }

    /// Builds a stored task in the world's project.
    pub fn stored_task(&self, title: &str, status: TaskStatus) -> eyre::Result<Task> {
        let mut task = Task::new(
            NewTaskData {
                project_id: self.project_id,
                creator_id: self.viewer,
                title: TaskTitle::new(title)?,
                description: None,
                priority: TaskPriority::Medium,
                assignee_id: None,
                deadline: None,
            },
            &DefaultClock,
        );
        task.assume_status(status);
        Ok(task)
    }

    /// Looks up a task id by its title.
    pub fn task_id(&self, title: &str) -> eyre::Result<TaskId> {
        self.titles
            .get(title)
            .copied()
            .ok_or_else(|| eyre::eyre!("no task titled {title:?} on the board"))
    }
}

impl Default for BoardSyncWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardSyncWorld {
    BoardSyncWorld::default()
}

/// Parses a column name used in feature files.
pub fn parse_status(text: &str) -> eyre::Result<TaskStatus> {
    TaskStatus::try_from(text).map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
