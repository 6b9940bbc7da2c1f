//! The Store trait that backends implement.

use crate::types::*;
use crate::StoreError;

/// The storage trait the `atrium-access` services depend on.
///
/// Every method is a single atomic unit: compound methods (membership
/// insert + audit append, role change + audit append, invitation admit)
/// must commit everything they describe or nothing. A backend that cannot
/// append an audit record together with its mutation must roll the
/// mutation back and return [`StoreError::AuditWrite`].
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    // ───────────────────────────────────── Members ────────────────────────────────────────

    /// Create a membership and append its join record in one atomic unit.
    /// Fails with `AlreadyExists` if the (project, user) pair already has
    /// a membership.
    async fn insert_member(
        &self,
        member: &NewMember,
        audit: &JoinAudit,
    ) -> Result<ProjectMember, StoreError>;

    /// Get a user's membership in a project.
    async fn get_member(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<ProjectMember, StoreError>;

    /// List all members of a project.
    async fn list_members(&self, project_id: &ProjectId) -> Result<Vec<ProjectMember>, StoreError>;

    /// Change a member's role and append the role-change record in one
    /// atomic unit. Returns the updated membership.
    async fn update_member_role(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
        new_role: Role,
        audit: &RoleChangeAudit,
    ) -> Result<ProjectMember, StoreError>;

    /// Remove a membership, returning the removed record.
    /// No audit record is appended for removals.
    async fn remove_member(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<ProjectMember, StoreError>;

    // ───────────────────────────────────── Invitations ────────────────────────────────────

    /// Create an invitation link. Any currently active link for the same
    /// project is deactivated in the same atomic unit (at most one active
    /// link per project).
    async fn create_invitation(
        &self,
        params: &NewInvitation,
    ) -> Result<InvitationLink, StoreError>;

    /// Get an invitation by ID.
    async fn get_invitation(
        &self,
        invitation_id: &InvitationId,
    ) -> Result<InvitationLink, StoreError>;

    /// Get an invitation by token hash.
    async fn get_invitation_by_token(&self, token_hash: &str)
        -> Result<InvitationLink, StoreError>;

    /// Get the active invitation for a project (`NotFound` when closed).
    async fn get_active_invitation(
        &self,
        project_id: &ProjectId,
    ) -> Result<InvitationLink, StoreError>;

    /// Deactivate an invitation. Links are never deleted.
    async fn deactivate_invitation(&self, invitation_id: &InvitationId)
        -> Result<(), StoreError>;

    /// List all invitations ever created for a project, newest first,
    /// including deactivated ones.
    async fn list_invitations(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<InvitationLink>, StoreError>;

    /// Admit a member through an invitation: the serializable acceptance
    /// unit. Fails with `Conflict` unless the link's use count still
    /// equals `expected_uses` (compare-and-swap; callers re-validate and
    /// retry), and with `AlreadyExists` if the membership appeared
    /// concurrently. On success the membership insert, the use-count
    /// increment, and the join record append commit together. Exhaustion
    /// is a computed condition on the link; the active flag records only
    /// explicit deactivation.
    async fn admit_member(
        &self,
        invitation_id: &InvitationId,
        expected_uses: u32,
        member: &NewMember,
        audit: &JoinAudit,
    ) -> Result<ProjectMember, StoreError>;

    // ───────────────────────────────────── Audit ──────────────────────────────────────────

    /// Join records for a project, newest first.
    async fn list_join_records(
        &self,
        project_id: &ProjectId,
        page: &Page,
    ) -> Result<Vec<JoinRecord>, StoreError>;

    /// Role-change records for a project, newest first.
    async fn list_role_change_records(
        &self,
        project_id: &ProjectId,
        page: &Page,
    ) -> Result<Vec<RoleChangeRecord>, StoreError>;

    /// Merged audit trail for a project, newest first, tagged by kind.
    async fn list_audit_records(
        &self,
        project_id: &ProjectId,
        page: &Page,
    ) -> Result<Vec<AuditRecord>, StoreError>;

    /// All join records attributed to one invitation link.
    async fn list_join_records_for_invitation(
        &self,
        invitation_id: &InvitationId,
    ) -> Result<Vec<JoinRecord>, StoreError>;
}
