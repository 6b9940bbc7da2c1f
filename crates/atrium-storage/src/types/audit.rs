//! Audit record types.
//!
//! Records are immutable once appended. Backends stamp `id` and
//! `occurred_at` at append time, inside the same atomic unit as the state
//! mutation the record describes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AuditRecordId, InvitationId, ProjectId, Role, UserId};

/// How a member entered the project
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JoinMethod {
    DirectAdd,
    Invitation,
}

impl std::fmt::Display for JoinMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JoinMethod::DirectAdd => "direct-add",
            JoinMethod::Invitation => "invitation",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for JoinMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct-add" => Ok(JoinMethod::DirectAdd),
            "invitation" => Ok(JoinMethod::Invitation),
            _ => Err(format!("Unknown join method: {}", s)),
        }
    }
}

/// A member joining a project
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JoinRecord {
    pub id: AuditRecordId,
    pub project_id: ProjectId,
    pub user_id: UserId,
    /// Role granted at join time
    pub role: Role,
    pub method: JoinMethod,
    /// Source invitation when `method` is `Invitation`
    pub invitation_id: Option<InvitationId>,
    /// Requester network metadata, best-effort opaque strings
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// A member's role changing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleChangeRecord {
    pub id: AuditRecordId,
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub old_role: Role,
    pub new_role: Role,
    pub changed_by: UserId,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// A single entry in the merged audit trail, tagged by kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditRecord {
    Join(JoinRecord),
    RoleChange(RoleChangeRecord),
}

impl AuditRecord {
    pub fn id(&self) -> AuditRecordId {
        match self {
            AuditRecord::Join(r) => r.id,
            AuditRecord::RoleChange(r) => r.id,
        }
    }

    pub fn project_id(&self) -> &ProjectId {
        match self {
            AuditRecord::Join(r) => &r.project_id,
            AuditRecord::RoleChange(r) => &r.project_id,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AuditRecord::Join(r) => r.occurred_at,
            AuditRecord::RoleChange(r) => r.occurred_at,
        }
    }
}

/// Audit payload for a membership insert. The backend fills in the member
/// identity and timestamps from the mutation itself.
#[derive(Clone, Debug)]
pub struct JoinAudit {
    pub method: JoinMethod,
    pub invitation_id: Option<InvitationId>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Audit payload for a role change. The backend records the old role from
/// current state.
#[derive(Clone, Debug)]
pub struct RoleChangeAudit {
    pub changed_by: UserId,
    pub reason: Option<String>,
}

/// Pagination window for audit queries
#[derive(Clone, Debug, Default)]
pub struct Page {
    /// Maximum number of results to return
    pub limit: Option<u32>,
    /// Number of results to skip
    pub offset: Option<u32>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}
