//! Adapter implementations for the board gateway port.

mod service;

pub use service::ServiceGateway;
