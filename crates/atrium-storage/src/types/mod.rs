//! Type definitions for atrium storage.

mod audit;
mod ids;
mod invitations;
mod members;
mod roles;

// Re-export all types from submodules
pub use audit::*;
pub use ids::*;
pub use invitations::*;
pub use members::*;
pub use roles::*;
