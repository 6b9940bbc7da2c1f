//! Audit trail queries.

use std::sync::Arc;

use atrium_storage::{AuditRecord, JoinRecord, Page, ProjectId, RoleChangeRecord, Store};

use crate::error::AccessError;

/// Read access to a project's audit trail. Records are immutable; only the
/// storage layer appends them, atomically with the mutations they describe.
pub struct AuditTrail<S> {
    store: Arc<S>,
}

impl<S> Clone for AuditTrail<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Store> AuditTrail<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Join events for a project, newest first.
    pub async fn join_history(
        &self,
        project_id: &ProjectId,
        page: &Page,
    ) -> Result<Vec<JoinRecord>, AccessError> {
        Ok(self.store.list_join_records(project_id, page).await?)
    }

    /// Role-change events for a project, newest first.
    pub async fn role_change_history(
        &self,
        project_id: &ProjectId,
        page: &Page,
    ) -> Result<Vec<RoleChangeRecord>, AccessError> {
        Ok(self.store.list_role_change_records(project_id, page).await?)
    }

    /// Merged trail of both kinds, newest first, tagged for the caller to
    /// discriminate.
    pub async fn trail(
        &self,
        project_id: &ProjectId,
        page: &Page,
    ) -> Result<Vec<AuditRecord>, AccessError> {
        Ok(self.store.list_audit_records(project_id, page).await?)
    }
}
