// Providers layer - Work performers and business logic
//
// Providers hold the domain rules and offer composable operations that
// coordinators orchestrate.

pub mod assignment_provider;
pub mod authentication_provider;
pub mod authorization_provider;
pub mod crypto_provider;
pub mod permission_provider;
pub mod role_provider;
pub mod token_provider;
pub mod user_provider;

pub use assignment_provider::AssignmentProvider;
pub use authentication_provider::AuthenticationProvider;
pub use authorization_provider::{AuthorizationProvider, LevelResolution};
pub use crypto_provider::CryptoProvider;
pub use permission_provider::PermissionProvider;
pub use role_provider::RoleProvider;
pub use token_provider::{IssuedToken, TokenProvider};
pub use user_provider::UserProvider;
