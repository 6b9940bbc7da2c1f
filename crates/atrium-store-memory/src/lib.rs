//! In-memory Store backend.
//!
//! This implementation is suitable for:
//! - Tests
//! - Single-process deployments
//! - Development
//!
//! Every trait method holds the one state lock for its whole duration, so
//! each compound operation is atomic and concurrent acceptances against
//! the same invitation link are serialized. State is only broadcast within
//! a single process; multi-replica deployments need a database backend.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use atrium_storage::{
    AuditRecord, AuditRecordId, InvitationId, InvitationLink, JoinAudit, JoinRecord, NewInvitation,
    NewMember, Page, ProjectId, ProjectMember, Role, RoleChangeAudit, RoleChangeRecord, Store,
    StoreError, UserId,
};

#[derive(Default)]
struct State {
    members: HashMap<(ProjectId, UserId), ProjectMember>,
    invitations: HashMap<InvitationId, InvitationLink>,
    /// token hash -> invitation id (redemption lookup)
    tokens: HashMap<String, InvitationId>,
    /// Append-only; insertion order is chronological.
    audit: Vec<AuditRecord>,
}

impl State {
    fn append_join(&mut self, member: &ProjectMember, audit: &JoinAudit) {
        self.audit.push(AuditRecord::Join(JoinRecord {
            id: AuditRecordId::new(),
            project_id: member.project_id.clone(),
            user_id: member.user_id.clone(),
            role: member.role,
            method: audit.method,
            invitation_id: audit.invitation_id.clone(),
            ip_address: audit.ip_address.clone(),
            user_agent: audit.user_agent.clone(),
            occurred_at: member.joined_at,
        }));
    }
}

/// In-memory [`Store`] over a single mutex-guarded state table.
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn paginate<T>(iter: impl Iterator<Item = T>, page: &Page) -> Vec<T> {
    let skipped = iter.skip(page.offset.unwrap_or(0) as usize);
    match page.limit {
        Some(limit) => skipped.take(limit as usize).collect(),
        None => skipped.collect(),
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    // ───────────────────────────────────── Members ────────────────────────────────────────

    async fn insert_member(
        &self,
        member: &NewMember,
        audit: &JoinAudit,
    ) -> Result<ProjectMember, StoreError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let key = (member.project_id.clone(), member.user_id.clone());
        if state.members.contains_key(&key) {
            return Err(StoreError::AlreadyExists);
        }

        let now = Utc::now();
        let record = ProjectMember {
            project_id: member.project_id.clone(),
            user_id: member.user_id.clone(),
            role: member.role,
            joined_at: now,
            updated_at: now,
        };
        state.members.insert(key, record.clone());
        state.append_join(&record, audit);
        Ok(record)
    }

    async fn get_member(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<ProjectMember, StoreError> {
        let state = self.state.lock();
        state
            .members
            .get(&(project_id.clone(), user_id.clone()))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_members(&self, project_id: &ProjectId) -> Result<Vec<ProjectMember>, StoreError> {
        let state = self.state.lock();
        let mut members: Vec<ProjectMember> = state
            .members
            .values()
            .filter(|m| &m.project_id == project_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.joined_at);
        Ok(members)
    }

    async fn update_member_role(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
        new_role: Role,
        audit: &RoleChangeAudit,
    ) -> Result<ProjectMember, StoreError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let member = state
            .members
            .get_mut(&(project_id.clone(), user_id.clone()))
            .ok_or(StoreError::NotFound)?;

        let old_role = member.role;
        let now = Utc::now();
        member.role = new_role;
        member.updated_at = now;
        let updated = member.clone();

        state.audit.push(AuditRecord::RoleChange(RoleChangeRecord {
            id: AuditRecordId::new(),
            project_id: project_id.clone(),
            user_id: user_id.clone(),
            old_role,
            new_role,
            changed_by: audit.changed_by.clone(),
            reason: audit.reason.clone(),
            occurred_at: now,
        }));
        Ok(updated)
    }

    async fn remove_member(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<ProjectMember, StoreError> {
        let mut state = self.state.lock();
        state
            .members
            .remove(&(project_id.clone(), user_id.clone()))
            .ok_or(StoreError::NotFound)
    }

    // ───────────────────────────────────── Invitations ────────────────────────────────────

    async fn create_invitation(
        &self,
        params: &NewInvitation,
    ) -> Result<InvitationLink, StoreError> {
        let mut state = self.state.lock();

        // At most one active link per project
        for link in state.invitations.values_mut() {
            if link.project_id == params.project_id && link.active {
                link.active = false;
            }
        }

        let link = InvitationLink {
            id: InvitationId(Uuid::new_v4()),
            project_id: params.project_id.clone(),
            token_hash: params.token_hash.clone(),
            created_by: params.created_by.clone(),
            role: params.role,
            max_uses: params.max_uses,
            use_count: 0,
            expires_at: params.expires_at,
            active: true,
            created_at: Utc::now(),
        };
        state.tokens.insert(link.token_hash.clone(), link.id.clone());
        state.invitations.insert(link.id.clone(), link.clone());
        Ok(link)
    }

    async fn get_invitation(
        &self,
        invitation_id: &InvitationId,
    ) -> Result<InvitationLink, StoreError> {
        let state = self.state.lock();
        state
            .invitations
            .get(invitation_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_invitation_by_token(
        &self,
        token_hash: &str,
    ) -> Result<InvitationLink, StoreError> {
        let state = self.state.lock();
        let id = state.tokens.get(token_hash).ok_or(StoreError::NotFound)?;
        state
            .invitations
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_active_invitation(
        &self,
        project_id: &ProjectId,
    ) -> Result<InvitationLink, StoreError> {
        let state = self.state.lock();
        state
            .invitations
            .values()
            .find(|l| &l.project_id == project_id && l.active)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn deactivate_invitation(
        &self,
        invitation_id: &InvitationId,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let link = state
            .invitations
            .get_mut(invitation_id)
            .ok_or(StoreError::NotFound)?;
        link.active = false;
        Ok(())
    }

    async fn list_invitations(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<InvitationLink>, StoreError> {
        let state = self.state.lock();
        let mut links: Vec<InvitationLink> = state
            .invitations
            .values()
            .filter(|l| &l.project_id == project_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| (b.created_at, b.id.0).cmp(&(a.created_at, a.id.0)));
        Ok(links)
    }

    async fn admit_member(
        &self,
        invitation_id: &InvitationId,
        expected_uses: u32,
        member: &NewMember,
        audit: &JoinAudit,
    ) -> Result<ProjectMember, StoreError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let key = (member.project_id.clone(), member.user_id.clone());
        if state.members.contains_key(&key) {
            return Err(StoreError::AlreadyExists);
        }

        let link = state
            .invitations
            .get_mut(invitation_id)
            .ok_or(StoreError::NotFound)?;
        if link.use_count != expected_uses {
            return Err(StoreError::Conflict);
        }

        // Exhaustion is computed from use_count; the active flag stays as
        // the record of explicit closure or displacement.
        link.use_count += 1;

        let now = Utc::now();
        let record = ProjectMember {
            project_id: member.project_id.clone(),
            user_id: member.user_id.clone(),
            role: member.role,
            joined_at: now,
            updated_at: now,
        };
        state.members.insert(key, record.clone());
        state.append_join(&record, audit);
        Ok(record)
    }

    // ───────────────────────────────────── Audit ──────────────────────────────────────────

    async fn list_join_records(
        &self,
        project_id: &ProjectId,
        page: &Page,
    ) -> Result<Vec<JoinRecord>, StoreError> {
        let state = self.state.lock();
        let iter = state.audit.iter().rev().filter_map(|r| match r {
            AuditRecord::Join(j) if &j.project_id == project_id => Some(j.clone()),
            _ => None,
        });
        Ok(paginate(iter, page))
    }

    async fn list_role_change_records(
        &self,
        project_id: &ProjectId,
        page: &Page,
    ) -> Result<Vec<RoleChangeRecord>, StoreError> {
        let state = self.state.lock();
        let iter = state.audit.iter().rev().filter_map(|r| match r {
            AuditRecord::RoleChange(c) if &c.project_id == project_id => Some(c.clone()),
            _ => None,
        });
        Ok(paginate(iter, page))
    }

    async fn list_audit_records(
        &self,
        project_id: &ProjectId,
        page: &Page,
    ) -> Result<Vec<AuditRecord>, StoreError> {
        let state = self.state.lock();
        let iter = state
            .audit
            .iter()
            .rev()
            .filter(|r| r.project_id() == project_id)
            .cloned();
        Ok(paginate(iter, page))
    }

    async fn list_join_records_for_invitation(
        &self,
        invitation_id: &InvitationId,
    ) -> Result<Vec<JoinRecord>, StoreError> {
        let state = self.state.lock();
        Ok(state
            .audit
            .iter()
            .filter_map(|r| match r {
                AuditRecord::Join(j) if j.invitation_id.as_ref() == Some(invitation_id) => {
                    Some(j.clone())
                }
                _ => None,
            })
            .collect())
    }
}
