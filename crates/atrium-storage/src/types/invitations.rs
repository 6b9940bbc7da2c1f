//! Invitation link types.

use chrono::{DateTime, Utc};

use super::{InvitationId, ProjectId, Role, UserId};

/// Invitation link record.
///
/// The plaintext secret is never stored; `token_hash` (SHA-256 hex of the
/// secret) is the only lookup key for redemption. Links are never deleted,
/// only deactivated, so historical statistics stay available.
#[derive(Clone, Debug)]
pub struct InvitationLink {
    pub id: InvitationId,
    pub project_id: ProjectId,
    pub token_hash: String,
    pub created_by: UserId,
    /// Role granted to joiners
    pub role: Role,
    /// None = unbounded
    pub max_uses: Option<u32>,
    pub use_count: u32,
    /// None = never expires
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl InvitationLink {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|t| t <= now)
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_uses.is_some_and(|m| self.use_count >= m)
    }

    /// Whether the link currently admits joiners.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.active && !self.is_expired(now) && !self.is_exhausted()
    }

    /// Remaining use budget (None = unbounded).
    pub fn remaining_uses(&self) -> Option<u32> {
        self.max_uses.map(|m| m.saturating_sub(self.use_count))
    }
}

/// Parameters for creating an invitation link
#[derive(Clone, Debug)]
pub struct NewInvitation {
    pub project_id: ProjectId,
    /// SHA-256 hex hash of the invite secret (for lookup)
    pub token_hash: String,
    pub created_by: UserId,
    pub role: Role,
    pub max_uses: Option<u32>,
    pub expires_at: Option<DateTime<Utc>>,
}
