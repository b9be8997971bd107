use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::SecretManager;
use crate::providers::{
    AssignmentProvider, AuthenticationProvider, AuthorizationProvider, CryptoProvider,
    PermissionProvider, RoleProvider, TokenProvider, UserProvider,
};
use crate::stores::{DatabaseEntityGraph, EntityGraph};

/// Centralized application data following the main-owned dependencies pattern
///
/// Everything is created once in main.rs and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::new(db, secret_manager)
///   ↓ creates once
///   ├─ db (DatabaseConnection)
///   ├─ graph (Arc<dyn EntityGraph>)
///   └─ providers, each holding the graph
///   ↓ wrapped in Arc<AppData>
///   ├─ LoginCoordinator::new(app_data)
///   ├─ UserCoordinator::new(app_data)
///   └─ AdminCoordinator::new(app_data)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub secret_manager: Arc<SecretManager>,
    pub graph: Arc<dyn EntityGraph>,
    pub crypto_provider: Arc<CryptoProvider>,
    pub token_provider: Arc<TokenProvider>,
    pub authentication_provider: Arc<AuthenticationProvider>,
    pub authorization_provider: Arc<AuthorizationProvider>,
    pub assignment_provider: Arc<AssignmentProvider>,
    pub user_provider: Arc<UserProvider>,
    pub role_provider: Arc<RoleProvider>,
    pub permission_provider: Arc<PermissionProvider>,
}

impl AppData {
    /// Wire the graph and providers over an already-migrated connection
    pub fn new(db: DatabaseConnection, secret_manager: Arc<SecretManager>) -> Self {
        tracing::debug!("Initializing AppData...");
        let graph: Arc<dyn EntityGraph> = Arc::new(DatabaseEntityGraph::new(db.clone()));
        Self::with_graph(db, secret_manager, graph)
    }

    /// Wire providers over a caller-supplied graph implementation
    pub fn with_graph(db: DatabaseConnection, secret_manager: Arc<SecretManager>, graph: Arc<dyn EntityGraph>) -> Self {
        let crypto_provider = Arc::new(CryptoProvider::new(secret_manager.clone()));
        let token_provider = Arc::new(TokenProvider::new(secret_manager.clone()));

        let app_data = Self {
            authentication_provider: Arc::new(AuthenticationProvider::new(graph.clone(), crypto_provider.clone())),
            authorization_provider: Arc::new(AuthorizationProvider::new(graph.clone())),
            assignment_provider: Arc::new(AssignmentProvider::new(graph.clone())),
            user_provider: Arc::new(UserProvider::new(graph.clone(), crypto_provider.clone())),
            role_provider: Arc::new(RoleProvider::new(graph.clone())),
            permission_provider: Arc::new(PermissionProvider::new(graph.clone())),
            db,
            secret_manager,
            graph,
            crypto_provider,
            token_provider,
        };

        tracing::debug!("AppData initialization complete");
        app_data
    }
}
