//! Storage abstraction for atrium.
//!
//! Backend crates (e.g., atrium-store-memory) implement the [`Store`] trait
//! so the access-control services in `atrium-access` don't depend on any
//! specific database engine or schema details.

use thiserror::Error;

mod store;
mod types;

#[cfg(feature = "test-support")]
pub use store::MockStore;
pub use store::Store;
pub use types::*;

/// Uniform error type for all storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("conflict")]
    Conflict,
    #[error("audit write failed: {0}")]
    AuditWrite(String),
    #[error("backend error: {0}")]
    Backend(String),
}
