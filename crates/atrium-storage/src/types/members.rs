//! Membership types.

use chrono::{DateTime, Utc};

use super::{ProjectId, Role, UserId};

/// A user's standing within a project. At most one record exists per
/// (project, user) pair; the role is mutated only through the role-change
/// operation.
#[derive(Clone, Debug)]
pub struct ProjectMember {
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a membership
#[derive(Clone, Debug)]
pub struct NewMember {
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub role: Role,
}
