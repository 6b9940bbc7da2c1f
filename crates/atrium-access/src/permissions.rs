//! Permission engine: role lookups and capability summaries.

use std::sync::Arc;

use serde::Serialize;

use atrium_storage::{ProjectId, Role, Store, StoreError, UserId};

use crate::error::AccessError;

/// Read-only permission checks for a project.
///
/// Never caches: every call re-reads the current membership, since a role
/// can change between calls. An absent membership is the normal "no access"
/// result, not an error; project existence is the caller's concern.
pub struct Permissions<S> {
    store: Arc<S>,
}

impl<S> Clone for Permissions<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Store> Permissions<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Whether the user holds at least `required` in the project.
    pub async fn check(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
        required: Role,
    ) -> Result<bool, AccessError> {
        match self.store.get_member(project_id, user_id).await {
            Ok(member) => Ok(member.role.at_least(required)),
            Err(StoreError::NotFound) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// The user's role in the project, if they are a member.
    pub async fn role_of(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<Option<Role>, AccessError> {
        match self.store.get_member(project_id, user_id).await {
            Ok(member) => Ok(Some(member.role)),
            Err(StoreError::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Capability summary derived from the single role lookup.
    pub async fn summary(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<PermissionSummary, AccessError> {
        Ok(match self.role_of(project_id, user_id).await? {
            Some(role) => PermissionSummary::for_role(role),
            None => PermissionSummary::default(),
        })
    }
}

/// What a role lets a member do, as a fixed per-role capability table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PermissionSummary {
    pub can_view_project: bool,
    pub can_upload_files: bool,
    pub can_post_messages: bool,
    pub can_manage_roles: bool,
    pub can_remove_members: bool,
    pub can_invite_members: bool,
    pub can_delete_project: bool,
}

impl PermissionSummary {
    pub fn for_role(role: Role) -> Self {
        Self {
            can_view_project: true,
            can_upload_files: role.at_least(Role::Member),
            can_post_messages: role.at_least(Role::Member),
            can_manage_roles: role.at_least(Role::Admin),
            can_remove_members: role.at_least(Role::Admin),
            can_invite_members: role.at_least(Role::Owner),
            can_delete_project: role.at_least(Role::Owner),
        }
    }
}
