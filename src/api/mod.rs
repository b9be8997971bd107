// API layer - HTTP endpoints
pub mod auth;
pub mod health;
pub mod helpers;
pub mod permissions;
pub mod roles;
pub mod users;

pub use auth::{AuthApi, BearerAuth};
pub use health::HealthApi;
pub use permissions::PermissionsApi;
pub use roles::RolesApi;
pub use users::UsersApi;
