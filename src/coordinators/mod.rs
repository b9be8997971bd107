// Coordinators layer - Workflow orchestration
//
// Coordinators compose provider operations for specific API endpoints: they
// resolve the caller, run the authorization gate, then call providers.

pub mod admin_coordinator;
pub mod login_coordinator;
pub mod user_coordinator;

pub use admin_coordinator::AdminCoordinator;
pub use login_coordinator::{LoginCoordinator, LoginOutcome};
pub use user_coordinator::UserCoordinator;
