// Stores layer - Data access and repository pattern
pub mod entity_graph;
pub mod membership_store;
pub mod permission_store;
pub mod role_store;
pub mod user_store;

pub use entity_graph::{DatabaseEntityGraph, EntityGraph};
pub use membership_store::MembershipStore;
pub use permission_store::PermissionStore;
pub use role_store::RoleStore;
pub use user_store::UserStore;

use sea_orm::{DbErr, SqlErr};

/// Unique-index violation reported by the driver, if any
pub(crate) fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => Some(message),
        _ => None,
    }
}
