use std::sync::Arc;

use crate::AppData;
use crate::errors::InternalError;
use crate::providers::user_provider::{CreateUserInput, UpdateUserInput};
use crate::providers::{AssignmentProvider, AuthorizationProvider, UserProvider};
use crate::stores::EntityGraph;
use crate::types::internal::context::RequestContext;
use crate::types::internal::graph::{PermissionRecord, RoleRecord, UserRecord};
use crate::types::internal::{Decision, Level, UserId};

/// User lifecycle and caller self-inspection
pub struct UserCoordinator {
    authorization_provider: Arc<AuthorizationProvider>,
    assignment_provider: Arc<AssignmentProvider>,
    user_provider: Arc<UserProvider>,
    graph: Arc<dyn EntityGraph>,
}

impl UserCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            authorization_provider: Arc::clone(&app_data.authorization_provider),
            assignment_provider: Arc::clone(&app_data.assignment_provider),
            user_provider: Arc::clone(&app_data.user_provider),
            graph: Arc::clone(&app_data.graph),
        }
    }

    /// The caller's own record, with its level re-read from the store
    pub async fn whoami(&self, ctx: &RequestContext) -> Result<UserRecord, InternalError> {
        let principal = ctx.principal()?;
        self.authorization_provider.require_resolved(&principal).await?;
        self.graph.get_user(principal.user_id).await
    }

    /// Resolved level and effective permission codes of the caller
    pub async fn my_permissions(&self, ctx: &RequestContext) -> Result<(Level, Vec<String>), InternalError> {
        let principal = ctx.principal()?;
        let level = self.authorization_provider.require_resolved(&principal).await?;
        let codes = self.authorization_provider.effective_codes(&principal).await?;
        Ok((level, codes))
    }

    /// Decision for the caller on `code`; a deny is a value, not an error
    pub async fn check(&self, ctx: &RequestContext, code: &str) -> Result<Decision, InternalError> {
        let principal = ctx.principal()?;
        self.authorization_provider.authorize(&principal, code).await
    }

    pub async fn create_user(&self, ctx: &RequestContext, input: CreateUserInput) -> Result<UserRecord, InternalError> {
        let principal = ctx.principal()?;
        let caller_level = self
            .authorization_provider
            .require_level(&principal, &Level::ADMIN_LEVELS)
            .await?;

        self.user_provider.create_user(&principal, caller_level, input).await
    }

    pub async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<UserRecord>, InternalError> {
        let principal = ctx.principal()?;
        self.authorization_provider.require_resolved(&principal).await?;
        self.graph.list_users().await
    }

    pub async fn get_user(&self, ctx: &RequestContext, id: UserId) -> Result<UserRecord, InternalError> {
        let principal = ctx.principal()?;
        self.authorization_provider.require_resolved(&principal).await?;
        self.graph.get_user(id).await
    }

    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        id: UserId,
        input: UpdateUserInput,
    ) -> Result<UserRecord, InternalError> {
        let principal = ctx.principal()?;
        let caller_level = self.authorization_provider.require_resolved(&principal).await?;

        self.user_provider.update_user(&principal, caller_level, id, input).await
    }

    pub async fn set_level(&self, ctx: &RequestContext, id: UserId, requested: &str) -> Result<UserRecord, InternalError> {
        let principal = ctx.principal()?;
        let caller_level = self
            .authorization_provider
            .require_level(&principal, &Level::ADMIN_LEVELS)
            .await?;

        self.assignment_provider
            .set_user_level(&principal, caller_level, id, requested)
            .await
    }

    pub async fn delete_user(&self, ctx: &RequestContext, id: UserId) -> Result<(), InternalError> {
        let principal = ctx.principal()?;
        let caller_level = self
            .authorization_provider
            .require_level(&principal, &Level::ADMIN_LEVELS)
            .await?;

        self.user_provider.delete_user(&principal, caller_level, id).await
    }

    pub async fn roles_of_user(&self, ctx: &RequestContext, id: UserId) -> Result<Vec<RoleRecord>, InternalError> {
        let principal = ctx.principal()?;
        self.authorization_provider.require_resolved(&principal).await?;
        self.graph.get_user(id).await?;
        self.graph.roles_of_user(id).await
    }

    pub async fn permissions_of_user(
        &self,
        ctx: &RequestContext,
        id: UserId,
    ) -> Result<Vec<PermissionRecord>, InternalError> {
        let principal = ctx.principal()?;
        self.authorization_provider.require_resolved(&principal).await?;
        self.graph.get_user(id).await?;
        self.graph.permissions_of_user(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::{AssignmentError, AuthorizationError};
    use crate::test::utils::{authenticated_context, new_permission, new_role, new_user, setup_test_app_data};

    #[tokio::test]
    async fn test_check_follows_role_assignment() {
        let app_data = setup_test_app_data().await;
        let graph = &app_data.graph;
        let user = graph.create_user(new_user("dana", Level::User)).await.unwrap();
        let role = graph.create_role(new_role("hr_viewer")).await.unwrap();
        let perm = graph.create_permission(new_permission("hr", "employees", "view")).await.unwrap();
        graph.add_role_permission(role.id, perm.id).await.unwrap();

        let coordinator = UserCoordinator::new(Arc::clone(&app_data));
        let ctx = authenticated_context(&app_data, &user);

        assert!(!coordinator.check(&ctx, "hr.employees.view").await.unwrap().is_allowed());

        graph.add_user_role(user.id, role.id).await.unwrap();
        assert!(coordinator.check(&ctx, "hr.employees.view").await.unwrap().is_allowed());

        let (level, codes) = coordinator.my_permissions(&ctx).await.unwrap();
        assert_eq!(level, Level::User);
        assert_eq!(codes, vec!["hr.employees.view".to_string()]);
    }

    #[tokio::test]
    async fn test_demoted_token_loses_admin_rights() {
        let app_data = setup_test_app_data().await;
        let graph = &app_data.graph;
        let admin = graph.create_user(new_user("erin", Level::Admin)).await.unwrap();
        let ctx = authenticated_context(&app_data, &admin);

        graph.set_user_level(admin.id, Level::User).await.unwrap();

        let coordinator = UserCoordinator::new(Arc::clone(&app_data));
        let result = coordinator.delete_user(&ctx, admin.id).await;
        assert!(matches!(
            result,
            Err(InternalError::Authorization(AuthorizationError::PermissionDenied { .. }))
        ));

        let me = coordinator.whoami(&ctx).await.unwrap();
        assert_eq!(me.level, "user");
    }

    #[tokio::test]
    async fn test_set_level_rejects_unknown_value() {
        let app_data = setup_test_app_data().await;
        let graph = &app_data.graph;
        let root = graph.create_user(new_user("root", Level::SuperAdmin)).await.unwrap();
        let target = graph.create_user(new_user("frank", Level::User)).await.unwrap();

        let coordinator = UserCoordinator::new(Arc::clone(&app_data));
        let ctx = authenticated_context(&app_data, &root);

        let result = coordinator.set_level(&ctx, target.id, "superuser").await;
        assert!(matches!(
            result,
            Err(InternalError::Assignment(AssignmentError::InvalidLevelValue { .. }))
        ));
        assert_eq!(graph.get_user(target.id).await.unwrap().level, "user");

        let promoted = coordinator.set_level(&ctx, target.id, "admin").await.unwrap();
        assert_eq!(promoted.level, "admin");
    }

    #[tokio::test]
    async fn test_deleted_caller_is_unresolved() {
        let app_data = setup_test_app_data().await;
        let graph = &app_data.graph;
        graph.create_user(new_user("root", Level::SuperAdmin)).await.unwrap();
        let user = graph.create_user(new_user("gone", Level::Admin)).await.unwrap();
        let ctx = authenticated_context(&app_data, &user);
        graph.delete_user(user.id).await.unwrap();

        let coordinator = UserCoordinator::new(Arc::clone(&app_data));
        let result = coordinator.list_users(&ctx).await;
        assert!(matches!(
            result,
            Err(InternalError::Authorization(AuthorizationError::PrincipalUnresolved { .. }))
        ));
    }
}
