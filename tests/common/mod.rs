// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use erp_admin_backend::AppData;
use erp_admin_backend::config::SecretManager;
use erp_admin_backend::types::internal::Level;
use erp_admin_backend::types::internal::context::RequestContext;
use erp_admin_backend::types::internal::graph::{NewPermission, NewRole, NewUser, UserRecord};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

pub const TEST_JWT_SECRET: &str = "integration-jwt-secret-at-least-32-chars";
pub const TEST_PASSWORD_PEPPER: &str = "integration-pepper";

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub async fn setup_app_data() -> Arc<AppData> {
    let secret_manager = Arc::new(SecretManager::new(
        TEST_JWT_SECRET.to_string(),
        TEST_PASSWORD_PEPPER.to_string(),
        60,
    ));
    Arc::new(AppData::new(setup_test_db().await, secret_manager))
}

/// Context carrying a token issued for `user` at its stored level
pub fn context_for(app_data: &AppData, user: &UserRecord) -> RequestContext {
    let level = user.level().expect("stored level must parse");
    let issued = app_data
        .token_provider
        .generate_jwt(user.id, &user.username, level)
        .expect("Failed to issue token");
    let claims = app_data
        .token_provider
        .validate_jwt(&issued.token)
        .expect("Failed to validate token");

    RequestContext::for_api(None).with_auth(claims)
}

pub async fn seed_user(app_data: &AppData, username: &str, level: Level) -> UserRecord {
    app_data
        .graph
        .create_user(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "placeholder".to_string(),
            level,
        })
        .await
        .expect("Failed to seed user")
}

pub fn role(name: &str) -> NewRole {
    NewRole {
        name: name.to_string(),
        display_name: name.to_string(),
        description: String::new(),
        is_system: false,
        created_by: None,
    }
}

pub fn permission(module_name: &str, resource: &str, action: &str) -> NewPermission {
    NewPermission {
        module_name: module_name.to_string(),
        resource: resource.to_string(),
        action: action.to_string(),
        display_name: format!("{}.{}.{}", module_name, resource, action),
        description: String::new(),
        auto_registered: false,
    }
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
///
/// Environment variables are process-global, so tests that modify them
/// must run serially.
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
