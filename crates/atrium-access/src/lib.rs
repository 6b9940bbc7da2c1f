//! atrium-access - project access control and membership admission
//!
//! This crate provides the access-control core of atrium:
//! - Permission checks against the project role hierarchy
//! - Membership management (add, role change, removal) with audit emission
//! - Invitation-based admission (open/close admissions, token redemption)
//! - Audit trail queries
//!
//! # Architecture
//!
//! Services are thin structs over an `Arc<S: Store>`; they own the business
//! rules while the storage backend owns atomicity. Every mutating operation
//! re-reads the requester's membership inside its own call, so a permission
//! decision is never older than the action it gates.

mod admissions;
mod audit;
mod config;
mod error;
mod members;
mod permissions;
mod token;

pub use admissions::{
    AcceptedInvitation, Admissions, InvitationStats, IssuedInvitation, OpenAdmissions,
};
pub use audit::AuditTrail;
pub use config::{AdmissionConfig, ConfigError, DEFAULT_TOKEN_LENGTH, MIN_TOKEN_LENGTH};
pub use error::AccessError;
pub use members::Memberships;
pub use permissions::{PermissionSummary, Permissions};

/// Best-effort network metadata of the request that triggered a join,
/// recorded on the audit trail.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
