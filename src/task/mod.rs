//! Task management for Gorex projects.
//!
//! Tasks live on a four-column board (`TODO`, `IN_PROGRESS`, `REVIEW`,
//! `DONE`). Any project member may move a task to any column; the
//! membership check is centralised in [`domain::can_transition`]. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
