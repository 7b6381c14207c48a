//! Project membership records and roles.

use super::{MemberId, ParseMemberRoleError, ProjectId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Role a user holds within a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// May invite and remove members; cannot itself be removed.
    Admin,
    /// Regular participant.
    #[default]
    Member,
}

impl MemberRole {
    /// Returns the canonical wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl TryFrom<&str> for MemberRole {
    type Error = ParseMemberRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(ParseMemberRoleError(value.to_owned())),
        }
    }
}

/// Join record between a user and a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMember {
    id: MemberId,
    project_id: ProjectId,
    user_id: UserId,
    role: MemberRole,
    joined_at: DateTime<Utc>,
}

impl ProjectMember {
    /// Creates a membership that takes effect immediately.
    #[must_use]
    pub fn new(project_id: ProjectId, user_id: UserId, role: MemberRole, clock: &impl Clock) -> Self {
        Self {
            id: MemberId::new(),
            project_id,
            user_id,
            role,
            joined_at: clock.utc(),
        }
    }

    /// Reconstructs a membership from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: MemberId,
        project_id: ProjectId,
        user_id: UserId,
        role: MemberRole,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            project_id,
            user_id,
            role,
            joined_at,
        }
    }

    /// Returns the membership identifier.
    #[must_use]
    pub const fn id(&self) -> MemberId {
        self.id
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the member's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the member's role.
    #[must_use]
    pub const fn role(&self) -> MemberRole {
        self.role
    }

    /// Returns when the member joined.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    /// Returns whether this member holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == MemberRole::Admin
    }
}
