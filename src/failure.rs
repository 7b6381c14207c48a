//! Reason classes shared by every rejected request.
//!
//! Service errors classify themselves into a [`FailureCause`]; the HTTP layer
//! turns the class into a status code and the board controller treats every
//! class alike.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a request against the store did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    /// No valid session accompanied the request.
    Unauthenticated,
    /// The actor is not allowed to act on the target.
    Forbidden,
    /// The target does not exist.
    NotFound,
    /// The request carried invalid input.
    Validation,
    /// The store failed internally.
    Server,
    /// The request or its response was lost in transit.
    NetworkFailure,
}

impl FailureCause {
    /// Returns a short stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::Server => "server",
            Self::NetworkFailure => "network_failure",
        }
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
