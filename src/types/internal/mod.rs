pub mod auth;
pub mod context;
pub mod decision;
pub mod graph;
pub mod level;
pub mod principal;

pub use decision::{AllowReason, Decision, DenyReason};
pub use graph::{MembershipChange, PermissionId, RoleId, UserId};
pub use level::Level;
pub use principal::Principal;
