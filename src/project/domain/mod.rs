//! Domain model for projects and project membership.

mod error;
mod ids;
mod member;
mod project;

pub use error::{ParseMemberRoleError, ParseProjectStatusError, ProjectDomainError};
pub use ids::{MemberId, ProjectId, UserId};
pub use member::{MemberRole, ProjectMember};
pub use project::{PersistedProjectData, Project, ProjectName, ProjectStatus};

pub(crate) use project::normalize_description;
