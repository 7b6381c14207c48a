//! Port definitions for board synchronisation.

mod gateway;

pub use gateway::{GatewayError, GatewayResult, TaskStatusGateway};
