//! Access control error taxonomy.

use thiserror::Error;

use atrium_storage::StoreError;

/// Errors raised by the access-control services.
///
/// All variants except [`AccessError::AuditWriteFailed`] and
/// [`AccessError::Storage`] are expected, caller-recoverable conditions.
/// `AuditWriteFailed` is fatal to the enclosing mutation: the backend rolled
/// the state change back, so nothing committed. Authentication failures are
/// the transport's concern and never raised here.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("user is not a member of this project")]
    NotAMember,

    #[error("user is already a member of this project")]
    AlreadyMember,

    #[error("insufficient permissions for this operation")]
    InsufficientPermissions,

    #[error("the project owner's role cannot be changed")]
    CannotModifyOwner,

    #[error("the project owner cannot be removed")]
    CannotRemoveOwner,

    #[error("invitation token does not match any invitation")]
    InvalidToken,

    #[error("invitation has been deactivated")]
    InvitationDeactivated,

    #[error("invitation has expired")]
    InvitationExpired,

    #[error("invitation has no remaining uses")]
    InvitationExhausted,

    #[error("audit record could not be written: {0}")]
    AuditWriteFailed(String),

    #[error("storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for AccessError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AuditWrite(msg) => AccessError::AuditWriteFailed(msg),
            err => AccessError::Storage(err),
        }
    }
}
