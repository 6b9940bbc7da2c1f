//! Admission controller: invitation links and token redemption.
//!
//! Each project has a single admission slot: opening admissions issues a
//! fresh link and displaces the previous active one; closing deactivates
//! it. The plaintext secret embedded in the invite URL is the only
//! credential for redemption.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use atrium_storage::{
    InvitationLink, JoinAudit, JoinMethod, NewInvitation, NewMember, ProjectId, ProjectMember,
    Role, Store, StoreError, UserId,
};

use crate::config::AdmissionConfig;
use crate::error::AccessError;
use crate::{token, RequestContext};

/// Parameters for opening admissions
#[derive(Clone, Debug, Default)]
pub struct OpenAdmissions {
    /// None = unbounded
    pub max_uses: Option<u32>,
    /// None = never expires
    pub expires_at: Option<DateTime<Utc>>,
    /// None = the configured default role
    pub role: Option<Role>,
}

/// A freshly opened invitation. `secret` is revealed here and never again.
#[derive(Clone, Debug)]
pub struct IssuedInvitation {
    pub link: InvitationLink,
    pub secret: String,
}

/// Result of redeeming an invitation token
#[derive(Clone, Debug)]
pub struct AcceptedInvitation {
    pub member: ProjectMember,
    /// True when the user already held a membership; nothing was consumed
    pub already_member: bool,
}

/// Usage statistics for one invitation link
#[derive(Clone, Debug)]
pub struct InvitationStats {
    pub link: InvitationLink,
    pub join_count: u32,
    pub unique_joiners: u32,
    pub joins_per_day: f64,
}

/// Invitation engine for project admission.
pub struct Admissions<S> {
    store: Arc<S>,
    config: AdmissionConfig,
}

impl<S> Clone for Admissions<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: Store> Admissions<S> {
    pub fn new(store: Arc<S>, config: AdmissionConfig) -> Self {
        Self { store, config }
    }

    /// Open admissions for a project. Owner only.
    ///
    /// Deactivates any currently active link for the project and issues a
    /// new one with a fresh secret.
    pub async fn open(
        &self,
        project_id: &ProjectId,
        requested_by: &UserId,
        params: OpenAdmissions,
    ) -> Result<IssuedInvitation, AccessError> {
        self.require_owner(project_id, requested_by).await?;

        let role = params.role.unwrap_or(self.config.default_invite_role);
        // An invitation must never mint a second owner
        if role == Role::Owner {
            return Err(AccessError::InsufficientPermissions);
        }

        let secret = token::generate_secret(self.config.token_length);
        let link = self
            .store
            .create_invitation(&NewInvitation {
                project_id: project_id.clone(),
                token_hash: token::hash_secret(&secret),
                created_by: requested_by.clone(),
                role,
                max_uses: params.max_uses,
                expires_at: params.expires_at,
            })
            .await?;

        tracing::info!(
            project_id = %project_id.0,
            invitation_id = %link.id.0,
            role = %role,
            max_uses = ?link.max_uses,
            expires_at = ?link.expires_at,
            "admissions opened"
        );
        Ok(IssuedInvitation { link, secret })
    }

    /// Close admissions for a project. Owner only; closing when already
    /// closed is a no-op.
    pub async fn close(
        &self,
        project_id: &ProjectId,
        requested_by: &UserId,
    ) -> Result<(), AccessError> {
        self.require_owner(project_id, requested_by).await?;

        match self.store.get_active_invitation(project_id).await {
            Ok(link) => {
                self.store.deactivate_invitation(&link.id).await?;
                tracing::info!(
                    project_id = %project_id.0,
                    invitation_id = %link.id.0,
                    "admissions closed"
                );
                Ok(())
            }
            Err(StoreError::NotFound) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Validate a token without consuming it, for rendering a project
    /// preview before the user commits to joining.
    pub async fn validate(&self, secret: &str) -> Result<InvitationLink, AccessError> {
        let link = match self
            .store
            .get_invitation_by_token(&token::hash_secret(secret))
            .await
        {
            Ok(link) => link,
            Err(StoreError::NotFound) => return Err(AccessError::InvalidToken),
            Err(err) => return Err(err.into()),
        };
        check_usable(&link)?;
        Ok(link)
    }

    /// Redeem an invitation token for the given user.
    ///
    /// Idempotent for existing members: they get their current membership
    /// back with `already_member = true`, and neither the use counter nor
    /// the audit trail moves. New members are admitted through the store's
    /// compare-and-swap unit; on conflict the link is re-validated before
    /// retrying, so concurrent acceptances never exceed the remaining
    /// budget.
    pub async fn accept(
        &self,
        secret: &str,
        user_id: &UserId,
        ctx: &RequestContext,
    ) -> Result<AcceptedInvitation, AccessError> {
        loop {
            let link = self.validate(secret).await?;

            match self.store.get_member(&link.project_id, user_id).await {
                Ok(existing) => {
                    return Ok(AcceptedInvitation {
                        member: existing,
                        already_member: true,
                    })
                }
                Err(StoreError::NotFound) => {}
                Err(err) => return Err(err.into()),
            }

            let member = NewMember {
                project_id: link.project_id.clone(),
                user_id: user_id.clone(),
                role: link.role,
            };
            let audit = JoinAudit {
                method: JoinMethod::Invitation,
                invitation_id: Some(link.id.clone()),
                ip_address: ctx.ip_address.clone(),
                user_agent: ctx.user_agent.clone(),
            };

            match self
                .store
                .admit_member(&link.id, link.use_count, &member, &audit)
                .await
            {
                Ok(record) => {
                    tracing::info!(
                        project_id = %link.project_id.0,
                        user_id = %user_id.0,
                        invitation_id = %link.id.0,
                        role = %record.role,
                        "invitation accepted"
                    );
                    return Ok(AcceptedInvitation {
                        member: record,
                        already_member: false,
                    });
                }
                // Use count moved under us; re-validate before retrying
                Err(StoreError::Conflict) => continue,
                // Membership appeared concurrently; next pass returns it
                Err(StoreError::AlreadyExists) => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// The project's active link, if one exists and is still usable.
    pub async fn active_link(
        &self,
        project_id: &ProjectId,
    ) -> Result<Option<InvitationLink>, AccessError> {
        match self.store.get_active_invitation(project_id).await {
            Ok(link) if link.is_usable(Utc::now()) => Ok(Some(link)),
            Ok(_) => Ok(None),
            Err(StoreError::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Per-link usage statistics over all historical links, including
    /// deactivated ones.
    pub async fn stats(&self, project_id: &ProjectId) -> Result<Vec<InvitationStats>, AccessError> {
        let links = self.store.list_invitations(project_id).await?;
        let now = Utc::now();

        let mut stats = Vec::with_capacity(links.len());
        for link in links {
            let joins = self.store.list_join_records_for_invitation(&link.id).await?;
            let unique: HashSet<&UserId> = joins.iter().map(|j| &j.user_id).collect();
            let unique_joiners = unique.len() as u32;
            let join_count = joins.len() as u32;
            let age_days = ((now - link.created_at).num_seconds() as f64 / 86_400.0).max(1.0);
            stats.push(InvitationStats {
                joins_per_day: f64::from(join_count) / age_days,
                join_count,
                unique_joiners,
                link,
            });
        }
        Ok(stats)
    }

    async fn require_owner(
        &self,
        project_id: &ProjectId,
        user_id: &UserId,
    ) -> Result<(), AccessError> {
        match self.store.get_member(project_id, user_id).await {
            Ok(member) if member.role.at_least(Role::Owner) => Ok(()),
            Ok(_) => Err(AccessError::InsufficientPermissions),
            Err(StoreError::NotFound) => Err(AccessError::InsufficientPermissions),
            Err(err) => Err(err.into()),
        }
    }
}

fn check_usable(link: &InvitationLink) -> Result<(), AccessError> {
    if !link.active {
        return Err(AccessError::InvitationDeactivated);
    }
    if link.is_expired(Utc::now()) {
        return Err(AccessError::InvitationExpired);
    }
    if link.is_exhausted() {
        return Err(AccessError::InvitationExhausted);
    }
    Ok(())
}
