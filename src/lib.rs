//! Gorex: team task management.
//!
//! Users create projects, invite members and track tasks on a four-column
//! Kanban board. The board moves cards optimistically and reconciles with
//! the store in the background.
//!
//! # Architecture
//!
//! Each feature module follows hexagonal architecture:
//!
//! - **Domain**: validated value types and aggregates
//! - **Ports**: repository and gateway traits
//! - **Adapters**: in-memory and `PostgreSQL` implementations
//! - **Services**: membership-checked orchestration
//!
//! # Modules
//!
//! - [`project`]: projects and their memberships
//! - [`task`]: tasks, statuses and the transition rule
//! - [`board`]: column projection and optimistic synchronisation
//! - [`http`]: the axum API
//! - [`config`], [`telemetry`]: server plumbing

pub mod board;
pub mod config;
pub mod failure;
pub mod http;
pub mod project;
pub mod task;
pub mod telemetry;
