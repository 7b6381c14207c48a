//! Board synchronisation services.

mod controller;

pub use controller::BoardSyncController;
