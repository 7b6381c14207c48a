//! Step definitions for optimistic board synchronisation scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
