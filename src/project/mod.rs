//! Projects and project membership.
//!
//! A project groups tasks and the users allowed to act on them. Membership
//! carries one of two flat roles; admins invite and remove members, and the
//! creator is always an admin member. The module follows the crate's
//! hexagonal layout:
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
