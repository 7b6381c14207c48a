//! Adapter implementations for project persistence ports.

pub mod memory;
pub mod postgres;
