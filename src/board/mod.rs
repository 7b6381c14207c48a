//! Kanban board for a single project.
//!
//! The board groups a project's tasks into four status columns and lets a
//! client move cards between them optimistically: a move is shown at once,
//! sent to the store in the background, and rolled back if the store
//! refuses it.
//!
//! - Projection and optimistic state in [`domain`]
//! - The store gateway contract in [`ports`]
//! - An in-process gateway in [`adapters`]
//! - The synchronising controller in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
