//! Common test helpers for the access-control integration tests.

use std::sync::Arc;

use uuid::Uuid;

use atrium_access::{
    AdmissionConfig, Admissions, AuditTrail, Memberships, Permissions, RequestContext,
};
use atrium_storage::{ProjectId, Role, UserId};
use atrium_store_memory::MemoryStore;

pub struct TestEnv {
    pub store: Arc<MemoryStore>,
    pub members: Memberships<MemoryStore>,
    pub admissions: Admissions<MemoryStore>,
    pub permissions: Permissions<MemoryStore>,
    pub audit: AuditTrail<MemoryStore>,
}

/// Build services over a fresh in-memory store.
pub fn test_env() -> TestEnv {
    let store = Arc::new(MemoryStore::new());
    TestEnv {
        members: Memberships::new(Arc::clone(&store)),
        admissions: Admissions::new(Arc::clone(&store), AdmissionConfig::default()),
        permissions: Permissions::new(Arc::clone(&store)),
        audit: AuditTrail::new(Arc::clone(&store)),
        store,
    }
}

pub fn project() -> ProjectId {
    ProjectId(Uuid::new_v4())
}

pub fn user() -> UserId {
    UserId(Uuid::new_v4())
}

pub fn ctx() -> RequestContext {
    RequestContext {
        ip_address: Some("203.0.113.7".to_string()),
        user_agent: Some("atrium-tests/1.0".to_string()),
    }
}

/// Seed a project with its owner; returns (project, owner).
pub async fn seed_project(env: &TestEnv) -> (ProjectId, UserId) {
    let project_id = project();
    let owner = user();
    env.members
        .add(&project_id, &owner, Role::Owner, &ctx())
        .await
        .unwrap();
    (project_id, owner)
}

/// Seed a project plus one member with the given role.
pub async fn seed_member(env: &TestEnv, project_id: &ProjectId, role: Role) -> UserId {
    let user_id = user();
    env.members
        .add(project_id, &user_id, role, &ctx())
        .await
        .unwrap();
    user_id
}
