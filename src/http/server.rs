//! Listener set-up for the API.

use super::{AppState, router};
use crate::project::ports::ProjectRepository;
use crate::task::ports::TaskRepository;
use mockable::Clock;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Binds `addr` and serves the API on a background task.
///
/// Returns the bound address, which differs from `addr` when binding port
/// `0`, and the handle of the serving task.
///
/// # Errors
///
/// Returns an I/O error when the address cannot be bound.
pub async fn start_server<T, P, C>(
    addr: &str,
    state: Arc<AppState<T, P, C>>,
) -> io::Result<(SocketAddr, JoinHandle<()>)>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;
    let app = router(state);

    let handle = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!(error = %err, "api server error");
        }
    });

    Ok((bound_addr, handle))
}

/// Binds `addr` and serves the API until `shutdown` resolves.
///
/// # Errors
///
/// Returns an I/O error when binding or serving fails.
pub async fn serve<T, P, C, F>(
    addr: &str,
    state: Arc<AppState<T, P, C>>,
    shutdown: F,
) -> io::Result<()>
where
    T: TaskRepository + 'static,
    P: ProjectRepository + 'static,
    C: Clock + Send + Sync + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "gorex api listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
