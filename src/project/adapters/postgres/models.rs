//! Diesel row models for project persistence.

use super::schema::{project_members, projects};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row shape shared by project queries and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Project name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Creator's user identifier.
    pub creator_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row shape shared by membership queries and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = project_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectMemberRow {
    /// Membership identifier.
    pub id: uuid::Uuid,
    /// Project identifier.
    pub project_id: uuid::Uuid,
    /// Member's user identifier.
    pub user_id: uuid::Uuid,
    /// Member role.
    pub role: String,
    /// Join timestamp.
    pub joined_at: DateTime<Utc>,
}
