//! Application services for projects and memberships.

mod membership;

pub use membership::{
    CreateProjectRequest, InviteMemberRequest, ProjectService, ProjectServiceError,
    ProjectServiceResult,
};
