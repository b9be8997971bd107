// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::SecretManager;
use crate::providers::CryptoProvider;
use crate::stores::DatabaseEntityGraph;
use crate::types::internal::context::RequestContext;
use crate::types::internal::graph::{NewPermission, NewRole, NewUser, UserRecord};
use crate::types::internal::Level;

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PASSWORD_PEPPER: &str = "test-pepper-for-unit-tests";

/// Fresh in-memory database with all migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub async fn setup_test_graph() -> Arc<DatabaseEntityGraph> {
    Arc::new(DatabaseEntityGraph::new(setup_test_db().await))
}

pub fn test_secret_manager() -> Arc<SecretManager> {
    Arc::new(SecretManager::new(
        TEST_JWT_SECRET.to_string(),
        TEST_PASSWORD_PEPPER.to_string(),
        60,
    ))
}

pub fn test_crypto_provider() -> Arc<CryptoProvider> {
    Arc::new(CryptoProvider::new(test_secret_manager()))
}

/// Full provider wiring over a fresh in-memory database
pub async fn setup_test_app_data() -> Arc<AppData> {
    Arc::new(AppData::new(setup_test_db().await, test_secret_manager()))
}

/// API context carrying freshly issued claims for `user`
///
/// The token claims the user's stored level; tests that need a stale claim
/// build one with `Principal::new` instead.
pub fn authenticated_context(app_data: &AppData, user: &UserRecord) -> RequestContext {
    let level = user.level().expect("stored level must parse");
    let issued = app_data
        .token_provider
        .generate_jwt(user.id, &user.username, level)
        .expect("Failed to issue test token");
    let claims = app_data
        .token_provider
        .validate_jwt(&issued.token)
        .expect("Failed to validate test token");

    RequestContext::for_api(None).with_auth(claims)
}

/// User insert with a placeholder hash; login tests hash real passwords
pub fn new_user(username: &str, level: Level) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        password_hash: "not-a-real-hash".to_string(),
        level,
    }
}

pub fn new_role(name: &str) -> NewRole {
    NewRole {
        name: name.to_string(),
        display_name: name.to_string(),
        description: String::new(),
        is_system: false,
        created_by: None,
    }
}

pub fn new_permission(module_name: &str, resource: &str, action: &str) -> NewPermission {
    NewPermission {
        module_name: module_name.to_string(),
        resource: resource.to_string(),
        action: action.to_string(),
        display_name: format!("{} {} {}", module_name, resource, action),
        description: String::new(),
        auto_registered: false,
    }
}
