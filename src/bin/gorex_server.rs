//! `gorex-server`: HTTP API for Gorex projects, tasks and boards.
//!
//! ```text
//! # In-memory store on the default address 0.0.0.0:8080
//! gorex-server
//!
//! # PostgreSQL store on a custom address
//! gorex-server --bind 127.0.0.1:3000 --database-url postgres://localhost/gorex
//! ```
//!
//! Requests identify the acting user with the `x-gorex-user` header.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use diesel::{
    PgConnection,
    r2d2::{ConnectionManager, Pool},
};
use gorex::{
    config::{GorexCliArgs, GorexConfig},
    http::{self, AppState},
    project::adapters::{memory::InMemoryProjectRepository, postgres::PostgresProjectRepository},
    task::adapters::{
        memory::InMemoryTaskRepository,
        postgres::{GorexPgPool, PostgresTaskRepository},
    },
    telemetry,
};
use mockable::DefaultClock;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = GorexCliArgs::parse();
    let config = match GorexConfig::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            telemetry::init_tracing("info");
            tracing::error!(error = %err, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    telemetry::init_tracing(&config.log_level);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "gorex server stopped with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: GorexConfig) -> Result<(), BoxError> {
    let clock = Arc::new(DefaultClock);
    if let Some(url) = config.database_url.clone() {
        tracing::info!(pool_size = config.pool_size, "using PostgreSQL storage");
        let pool = connect(url, config.pool_size).await?;
        let state = Arc::new(AppState::new(
            Arc::new(PostgresTaskRepository::new(pool.clone())),
            Arc::new(PostgresProjectRepository::new(pool)),
            clock,
        ));
        http::serve(&config.bind_addr, state, shutdown_signal()).await?;
    } else {
        tracing::info!("using in-memory storage");
        let state = Arc::new(AppState::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(InMemoryProjectRepository::new()),
            clock,
        ));
        http::serve(&config.bind_addr, state, shutdown_signal()).await?;
    }
    tracing::info!("gorex server shut down");
    Ok(())
}

async fn connect(url: String, pool_size: u32) -> Result<GorexPgPool, BoxError> {
    let pool = tokio::task::spawn_blocking(move || {
        Pool::builder()
            .max_size(pool_size)
            .build(ConnectionManager::<PgConnection>::new(url))
    })
    .await??;
    Ok(pool)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
