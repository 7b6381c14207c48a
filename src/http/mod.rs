//! HTTP API over the project and task services.
//!
//! Every `/api` route needs the [`ACTOR_HEADER`] naming the acting user.
//! Failures, including malformed paths, queries and bodies, render as
//! `{"error": "<message>"}`.

mod actor;
mod error;
mod extract;
mod routes;
mod server;
mod state;

pub use actor::{ACTOR_HEADER, Actor};
pub use error::ApiError;
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use routes::router;
pub use server::{serve, start_server};
pub use state::AppState;
