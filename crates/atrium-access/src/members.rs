//! Membership management: direct adds, role changes, removals.

use std::sync::Arc;

use atrium_storage::{
    JoinAudit, JoinMethod, NewMember, ProjectId, ProjectMember, Role, RoleChangeAudit, Store,
    StoreError, UserId,
};

use crate::error::AccessError;
use crate::RequestContext;

/// Membership service for a project.
///
/// Mutations re-read the requester's membership inside the call; the
/// backend commits each mutation together with its audit record.
pub struct Memberships<S> {
    store: Arc<S>,
}

impl<S> Clone for Memberships<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Store> Memberships<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Add a user directly to a project.
    ///
    /// Appends a `direct-add` join record atomically with the insert.
    pub async fn add(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
        role: Role,
        ctx: &RequestContext,
    ) -> Result<ProjectMember, AccessError> {
        let member = NewMember {
            project_id: project_id.clone(),
            user_id: user_id.clone(),
            role,
        };
        let audit = JoinAudit {
            method: JoinMethod::DirectAdd,
            invitation_id: None,
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
        };

        match self.store.insert_member(&member, &audit).await {
            Ok(record) => {
                tracing::info!(
                    project_id = %project_id.0,
                    user_id = %user_id.0,
                    role = %role,
                    "member added"
                );
                Ok(record)
            }
            Err(StoreError::AlreadyExists) => Err(AccessError::AlreadyMember),
            Err(err) => Err(err.into()),
        }
    }

    /// Change a member's role.
    ///
    /// The requester must strictly outrank both the target's current role
    /// and the role being assigned; the owner's role is never changeable
    /// through this operation, regardless of requester.
    pub async fn change_role(
        &self,
        project_id: &ProjectId,
        target_user_id: &UserId,
        new_role: Role,
        requested_by: &UserId,
        reason: Option<String>,
    ) -> Result<ProjectMember, AccessError> {
        let target = match self.store.get_member(project_id, target_user_id).await {
            Ok(member) => member,
            Err(StoreError::NotFound) => return Err(AccessError::NotAMember),
            Err(err) => return Err(err.into()),
        };
        if target.role == Role::Owner {
            return Err(AccessError::CannotModifyOwner);
        }

        let requester = self.requester_role(project_id, requested_by).await?;
        if !requester.outranks(target.role) || !requester.outranks(new_role) {
            return Err(AccessError::InsufficientPermissions);
        }

        let audit = RoleChangeAudit {
            changed_by: requested_by.clone(),
            reason,
        };
        match self
            .store
            .update_member_role(project_id, target_user_id, new_role, &audit)
            .await
        {
            Ok(updated) => {
                tracing::info!(
                    project_id = %project_id.0,
                    user_id = %target_user_id.0,
                    old_role = %target.role,
                    new_role = %new_role,
                    changed_by = %requested_by.0,
                    "member role changed"
                );
                Ok(updated)
            }
            // Target removed between the guard read and the mutation
            Err(StoreError::NotFound) => Err(AccessError::NotAMember),
            Err(err) => Err(err.into()),
        }
    }

    /// Remove a member from a project, returning the removed record.
    ///
    /// The requester must strictly outrank the target; the owner is never
    /// removable. Removals append no audit record; the reason only reaches
    /// the service log.
    pub async fn remove(
        &self,
        project_id: &ProjectId,
        target_user_id: &UserId,
        requested_by: &UserId,
        reason: Option<String>,
    ) -> Result<ProjectMember, AccessError> {
        let target = match self.store.get_member(project_id, target_user_id).await {
            Ok(member) => member,
            Err(StoreError::NotFound) => return Err(AccessError::NotAMember),
            Err(err) => return Err(err.into()),
        };
        if target.role == Role::Owner {
            return Err(AccessError::CannotRemoveOwner);
        }

        let requester = self.requester_role(project_id, requested_by).await?;
        if !requester.outranks(target.role) {
            return Err(AccessError::InsufficientPermissions);
        }

        match self.store.remove_member(project_id, target_user_id).await {
            Ok(removed) => {
                tracing::info!(
                    project_id = %project_id.0,
                    user_id = %target_user_id.0,
                    role = %removed.role,
                    removed_by = %requested_by.0,
                    reason = reason.as_deref(),
                    "member removed"
                );
                Ok(removed)
            }
            Err(StoreError::NotFound) => Err(AccessError::NotAMember),
            Err(err) => Err(err.into()),
        }
    }

    /// List all members of a project.
    pub async fn list(&self, project_id: &ProjectId) -> Result<Vec<ProjectMember>, AccessError> {
        Ok(self.store.list_members(project_id).await?)
    }

    async fn requester_role(
        &self,
        project_id: &ProjectId,
        requested_by: &UserId,
    ) -> Result<Role, AccessError> {
        match self.store.get_member(project_id, requested_by).await {
            Ok(member) => Ok(member.role),
            // A non-member requester has no standing at all
            Err(StoreError::NotFound) => Err(AccessError::InsufficientPermissions),
            Err(err) => Err(err.into()),
        }
    }
}
