use std::sync::Arc;

use crate::AppData;
use crate::errors::InternalError;
use crate::providers::role_provider::CreateRoleInput;
use crate::providers::{AssignmentProvider, AuthorizationProvider, PermissionProvider, RoleProvider};
use crate::stores::EntityGraph;
use crate::types::internal::context::RequestContext;
use crate::types::internal::graph::{
    NewPermission, PermissionRecord, PermissionUpdate, RoleRecord, RoleUpdate, UserRecord,
};
use crate::types::internal::{Level, MembershipChange, PermissionId, Principal, RoleId, UserId};

/// Role and permission administration
///
/// Every mutation requires an admin level resolved from the store. An `admin`
/// caller may additionally only hand out or take back what it is itself
/// authorized for: a permission's code when granting it to a role, and every
/// code a role carries when assigning that role to a user. `super_admin` is
/// unrestricted.
pub struct AdminCoordinator {
    authorization_provider: Arc<AuthorizationProvider>,
    assignment_provider: Arc<AssignmentProvider>,
    role_provider: Arc<RoleProvider>,
    permission_provider: Arc<PermissionProvider>,
    graph: Arc<dyn EntityGraph>,
}

impl AdminCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            authorization_provider: Arc::clone(&app_data.authorization_provider),
            assignment_provider: Arc::clone(&app_data.assignment_provider),
            role_provider: Arc::clone(&app_data.role_provider),
            permission_provider: Arc::clone(&app_data.permission_provider),
            graph: Arc::clone(&app_data.graph),
        }
    }

    async fn require_admin(&self, ctx: &RequestContext) -> Result<(Principal, Level), InternalError> {
        let principal = ctx.principal()?;
        let level = self
            .authorization_provider
            .require_level(&principal, &Level::ADMIN_LEVELS)
            .await?;
        Ok((principal, level))
    }

    async fn require_authenticated(&self, ctx: &RequestContext) -> Result<(), InternalError> {
        let principal = ctx.principal()?;
        self.authorization_provider.require_resolved(&principal).await?;
        Ok(())
    }

    /// Module-scoped delegation for grant/revoke
    async fn require_delegable(
        &self,
        principal: &Principal,
        permission: &PermissionRecord,
    ) -> Result<(), InternalError> {
        self.authorization_provider.require(principal, &permission.code).await
    }

    /// Role assignment is delegation of every code the role carries
    async fn require_role_delegable(
        &self,
        principal: &Principal,
        level: Level,
        role_id: RoleId,
    ) -> Result<(), InternalError> {
        if level == Level::SuperAdmin {
            return Ok(());
        }

        for permission in self.graph.permissions_of_role(role_id).await? {
            self.require_delegable(principal, &permission).await?;
        }
        Ok(())
    }

    // Roles

    pub async fn create_role(&self, ctx: &RequestContext, input: CreateRoleInput) -> Result<RoleRecord, InternalError> {
        let (principal, level) = self.require_admin(ctx).await?;
        self.role_provider.create_role(&principal, level, input).await
    }

    pub async fn list_roles(&self, ctx: &RequestContext) -> Result<Vec<RoleRecord>, InternalError> {
        self.require_authenticated(ctx).await?;
        self.graph.list_roles().await
    }

    pub async fn get_role(&self, ctx: &RequestContext, id: RoleId) -> Result<RoleRecord, InternalError> {
        self.require_authenticated(ctx).await?;
        self.graph.get_role(id).await
    }

    pub async fn update_role(
        &self,
        ctx: &RequestContext,
        id: RoleId,
        changes: RoleUpdate,
    ) -> Result<RoleRecord, InternalError> {
        let (_, level) = self.require_admin(ctx).await?;
        self.role_provider.update_role(level, id, changes).await
    }

    pub async fn delete_role(&self, ctx: &RequestContext, id: RoleId) -> Result<(), InternalError> {
        let (_, level) = self.require_admin(ctx).await?;
        self.role_provider.delete_role(level, id).await
    }

    pub async fn users_of_role(&self, ctx: &RequestContext, id: RoleId) -> Result<Vec<UserRecord>, InternalError> {
        self.require_authenticated(ctx).await?;
        self.graph.get_role(id).await?;
        self.graph.users_of_role(id).await
    }

    pub async fn permissions_of_role(
        &self,
        ctx: &RequestContext,
        id: RoleId,
    ) -> Result<Vec<PermissionRecord>, InternalError> {
        self.require_authenticated(ctx).await?;
        self.graph.get_role(id).await?;
        self.graph.permissions_of_role(id).await
    }

    pub async fn assign_role(
        &self,
        ctx: &RequestContext,
        role_id: RoleId,
        user_id: UserId,
    ) -> Result<MembershipChange, InternalError> {
        let (principal, level) = self.require_admin(ctx).await?;
        self.require_role_delegable(&principal, level, role_id).await?;

        let change = self.assignment_provider.assign_role(user_id, role_id).await?;
        tracing::info!(request_id = %ctx.request_id, actor = %principal, user_id, role_id, "assign_role");
        Ok(change)
    }

    pub async fn revoke_role(
        &self,
        ctx: &RequestContext,
        role_id: RoleId,
        user_id: UserId,
    ) -> Result<MembershipChange, InternalError> {
        let (principal, level) = self.require_admin(ctx).await?;
        self.require_role_delegable(&principal, level, role_id).await?;

        let change = self.assignment_provider.revoke_role(user_id, role_id).await?;
        tracing::info!(request_id = %ctx.request_id, actor = %principal, user_id, role_id, "revoke_role");
        Ok(change)
    }

    // Permissions

    pub async fn create_permission(
        &self,
        ctx: &RequestContext,
        new_permission: NewPermission,
    ) -> Result<PermissionRecord, InternalError> {
        self.require_admin(ctx).await?;
        self.permission_provider.create_permission(new_permission).await
    }

    /// Idempotently register a code reported by a module
    ///
    /// Returns the existing row when the code is already catalogued, otherwise
    /// creates it flagged as auto-registered.
    pub async fn register_permission(
        &self,
        ctx: &RequestContext,
        code: &str,
        display_name: &str,
    ) -> Result<PermissionRecord, InternalError> {
        let (principal, _) = self.require_admin(ctx).await?;
        let permission = self.permission_provider.ensure_registered(code, display_name).await?;
        tracing::info!(request_id = %ctx.request_id, actor = %principal, code, "register_permission");
        Ok(permission)
    }

    pub async fn list_permissions(&self, ctx: &RequestContext) -> Result<Vec<PermissionRecord>, InternalError> {
        self.require_authenticated(ctx).await?;
        self.graph.list_permissions().await
    }

    pub async fn get_permission(&self, ctx: &RequestContext, id: PermissionId) -> Result<PermissionRecord, InternalError> {
        self.require_authenticated(ctx).await?;
        self.graph.get_permission(id).await
    }

    pub async fn update_permission(
        &self,
        ctx: &RequestContext,
        id: PermissionId,
        changes: PermissionUpdate,
    ) -> Result<PermissionRecord, InternalError> {
        self.require_admin(ctx).await?;
        self.permission_provider.update_permission(id, changes).await
    }

    pub async fn delete_permission(&self, ctx: &RequestContext, id: PermissionId) -> Result<(), InternalError> {
        self.require_admin(ctx).await?;
        self.permission_provider.delete_permission(id).await
    }

    pub async fn roles_of_permission(
        &self,
        ctx: &RequestContext,
        id: PermissionId,
    ) -> Result<Vec<RoleRecord>, InternalError> {
        self.require_authenticated(ctx).await?;
        self.graph.get_permission(id).await?;
        self.graph.roles_of_permission(id).await
    }

    pub async fn grant_permission(
        &self,
        ctx: &RequestContext,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> Result<MembershipChange, InternalError> {
        let (principal, _) = self.require_admin(ctx).await?;
        let permission = self.graph.get_permission(permission_id).await?;
        self.require_delegable(&principal, &permission).await?;

        let change = self.assignment_provider.assign_permission(role_id, permission_id).await?;
        tracing::info!(request_id = %ctx.request_id, actor = %principal, role_id, code = %permission.code, "grant_permission");
        Ok(change)
    }

    pub async fn revoke_permission(
        &self,
        ctx: &RequestContext,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> Result<MembershipChange, InternalError> {
        let (principal, _) = self.require_admin(ctx).await?;
        let permission = self.graph.get_permission(permission_id).await?;
        self.require_delegable(&principal, &permission).await?;

        let change = self.assignment_provider.revoke_permission(role_id, permission_id).await?;
        tracing::info!(request_id = %ctx.request_id, actor = %principal, role_id, code = %permission.code, "revoke_permission");
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::{AuthorizationError, EntityError};
    use crate::test::utils::{authenticated_context, new_permission, new_role, new_user, setup_test_app_data};

    #[tokio::test]
    async fn test_user_level_cannot_create_role() {
        let app_data = setup_test_app_data().await;
        let user = app_data.graph.create_user(new_user("plain", Level::User)).await.unwrap();
        let coordinator = AdminCoordinator::new(Arc::clone(&app_data));

        let ctx = authenticated_context(&app_data, &user);
        let input = CreateRoleInput {
            name: "clerk".to_string(),
            display_name: String::new(),
            description: String::new(),
            is_system: false,
        };

        let result = coordinator.create_role(&ctx, input).await;
        assert!(matches!(
            result,
            Err(InternalError::Authorization(AuthorizationError::PermissionDenied { .. }))
        ));
    }

    #[tokio::test]
    async fn test_unauthenticated_context_is_unresolved() {
        let app_data = setup_test_app_data().await;
        let coordinator = AdminCoordinator::new(Arc::clone(&app_data));

        let result = coordinator.list_roles(&RequestContext::for_api(None)).await;
        assert!(matches!(
            result,
            Err(InternalError::Authorization(AuthorizationError::PrincipalUnresolved { .. }))
        ));
    }

    #[tokio::test]
    async fn test_admin_grant_is_limited_to_held_modules() {
        let app_data = setup_test_app_data().await;
        let graph = &app_data.graph;
        let admin = graph.create_user(new_user("finadmin", Level::Admin)).await.unwrap();
        let role = graph.create_role(new_role("finance_lead")).await.unwrap();
        let budget = graph.create_permission(new_permission("finance", "budget", "manage")).await.unwrap();
        let payroll = graph.create_permission(new_permission("hr", "payroll", "view")).await.unwrap();
        graph.add_role_permission(role.id, budget.id).await.unwrap();
        graph.add_user_role(admin.id, role.id).await.unwrap();

        let target = graph.create_role(new_role("analyst")).await.unwrap();
        let coordinator = AdminCoordinator::new(Arc::clone(&app_data));
        let ctx = authenticated_context(&app_data, &admin);

        let granted = coordinator.grant_permission(&ctx, budget.id, target.id).await.unwrap();
        assert_eq!(granted, MembershipChange::Created);

        let denied = coordinator.grant_permission(&ctx, payroll.id, target.id).await;
        assert!(matches!(
            denied,
            Err(InternalError::Authorization(AuthorizationError::PermissionDenied { .. }))
        ));
        assert!(!graph.has_role_permission(target.id, payroll.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_admin_cannot_assign_role_outside_held_modules() {
        let app_data = setup_test_app_data().await;
        let graph = &app_data.graph;
        let admin = graph.create_user(new_user("finadmin", Level::Admin)).await.unwrap();
        let finance_lead = graph.create_role(new_role("finance_lead")).await.unwrap();
        let budget = graph.create_permission(new_permission("finance", "budget", "manage")).await.unwrap();
        graph.add_role_permission(finance_lead.id, budget.id).await.unwrap();
        graph.add_user_role(admin.id, finance_lead.id).await.unwrap();

        let hr_manager = graph.create_role(new_role("hr_manager")).await.unwrap();
        let payroll = graph.create_permission(new_permission("hr", "payroll", "view")).await.unwrap();
        graph.add_role_permission(hr_manager.id, payroll.id).await.unwrap();

        let coordinator = AdminCoordinator::new(Arc::clone(&app_data));
        let ctx = authenticated_context(&app_data, &admin);

        let result = coordinator.assign_role(&ctx, hr_manager.id, admin.id).await;
        assert!(matches!(
            result,
            Err(InternalError::Authorization(AuthorizationError::PermissionDenied { .. }))
        ));
        assert!(!graph.has_user_role(admin.id, hr_manager.id).await.unwrap());

        // The self-assignment route to another module stays closed
        let principal = ctx.principal().unwrap();
        let decision = app_data
            .authorization_provider
            .authorize(&principal, "hr.employees.delete")
            .await
            .unwrap();
        assert!(!decision.is_allowed());
        assert!(coordinator.grant_permission(&ctx, payroll.id, finance_lead.id).await.is_err());

        // Roles within the admin's own modules remain assignable
        let clerk = graph.create_user(new_user("clerk", Level::User)).await.unwrap();
        assert_eq!(
            coordinator.assign_role(&ctx, finance_lead.id, clerk.id).await.unwrap(),
            MembershipChange::Created
        );
        assert_eq!(
            coordinator.revoke_role(&ctx, finance_lead.id, clerk.id).await.unwrap(),
            MembershipChange::Removed
        );
    }

    #[tokio::test]
    async fn test_admin_cannot_revoke_role_outside_held_modules() {
        let app_data = setup_test_app_data().await;
        let graph = &app_data.graph;
        let admin = graph.create_user(new_user("opsadmin", Level::Admin)).await.unwrap();
        let clerk = graph.create_user(new_user("hrclerk", Level::User)).await.unwrap();
        let hr_manager = graph.create_role(new_role("hr_manager")).await.unwrap();
        let payroll = graph.create_permission(new_permission("hr", "payroll", "view")).await.unwrap();
        graph.add_role_permission(hr_manager.id, payroll.id).await.unwrap();
        graph.add_user_role(clerk.id, hr_manager.id).await.unwrap();

        let coordinator = AdminCoordinator::new(Arc::clone(&app_data));
        let ctx = authenticated_context(&app_data, &admin);

        let result = coordinator.revoke_role(&ctx, hr_manager.id, clerk.id).await;
        assert!(matches!(
            result,
            Err(InternalError::Authorization(AuthorizationError::PermissionDenied { .. }))
        ));
        assert!(graph.has_user_role(clerk.id, hr_manager.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_super_admin_assigns_any_role() {
        let app_data = setup_test_app_data().await;
        let graph = &app_data.graph;
        let root = graph.create_user(new_user("root", Level::SuperAdmin)).await.unwrap();
        let clerk = graph.create_user(new_user("clerk", Level::User)).await.unwrap();
        let hr_manager = graph.create_role(new_role("hr_manager")).await.unwrap();
        let payroll = graph.create_permission(new_permission("hr", "payroll", "view")).await.unwrap();
        graph.add_role_permission(hr_manager.id, payroll.id).await.unwrap();

        let coordinator = AdminCoordinator::new(Arc::clone(&app_data));
        let ctx = authenticated_context(&app_data, &root);

        assert_eq!(
            coordinator.assign_role(&ctx, hr_manager.id, clerk.id).await.unwrap(),
            MembershipChange::Created
        );
    }

    #[tokio::test]
    async fn test_register_permission_is_idempotent_and_flags_auto_registration() {
        let app_data = setup_test_app_data().await;
        let admin = app_data.graph.create_user(new_user("ops", Level::Admin)).await.unwrap();
        let coordinator = AdminCoordinator::new(Arc::clone(&app_data));
        let ctx = authenticated_context(&app_data, &admin);

        let registered = coordinator
            .register_permission(&ctx, "inventory.stock.adjust", "Adjust stock")
            .await
            .unwrap();
        assert!(registered.auto_registered);
        assert!(registered.registered_at.is_some());
        assert_eq!(registered.module_name, "inventory");

        let again = coordinator
            .register_permission(&ctx, "inventory.stock.adjust", "Renamed")
            .await
            .unwrap();
        assert_eq!(again.id, registered.id);
        assert_eq!(again.display_name, "Adjust stock");

        let malformed = coordinator.register_permission(&ctx, "inventory.stock", "Bad").await;
        assert!(matches!(
            malformed,
            Err(InternalError::Entity(EntityError::InvalidPermissionCode { .. }))
        ));
    }

    #[tokio::test]
    async fn test_register_permission_requires_admin_level() {
        let app_data = setup_test_app_data().await;
        let user = app_data.graph.create_user(new_user("plain", Level::User)).await.unwrap();
        let coordinator = AdminCoordinator::new(Arc::clone(&app_data));
        let ctx = authenticated_context(&app_data, &user);

        let result = coordinator.register_permission(&ctx, "inventory.stock.adjust", "Adjust").await;
        assert!(matches!(
            result,
            Err(InternalError::Authorization(AuthorizationError::PermissionDenied { .. }))
        ));
        assert!(app_data.graph.find_permission_by_code("inventory.stock.adjust").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_super_admin_grants_any_permission() {
        let app_data = setup_test_app_data().await;
        let graph = &app_data.graph;
        let root = graph.create_user(new_user("root", Level::SuperAdmin)).await.unwrap();
        let role = graph.create_role(new_role("hr_clerk")).await.unwrap();
        let perm = graph.create_permission(new_permission("hr", "employees", "view")).await.unwrap();

        let coordinator = AdminCoordinator::new(Arc::clone(&app_data));
        let ctx = authenticated_context(&app_data, &root);

        assert_eq!(
            coordinator.grant_permission(&ctx, perm.id, role.id).await.unwrap(),
            MembershipChange::Created
        );
        assert_eq!(
            coordinator.grant_permission(&ctx, perm.id, role.id).await.unwrap(),
            MembershipChange::Unchanged
        );
        assert_eq!(
            coordinator.revoke_permission(&ctx, perm.id, role.id).await.unwrap(),
            MembershipChange::Removed
        );
    }

    #[tokio::test]
    async fn test_assign_role_to_missing_user_is_not_found() {
        let app_data = setup_test_app_data().await;
        let root = app_data.graph.create_user(new_user("root", Level::SuperAdmin)).await.unwrap();
        let role = app_data.graph.create_role(new_role("viewer")).await.unwrap();

        let coordinator = AdminCoordinator::new(Arc::clone(&app_data));
        let ctx = authenticated_context(&app_data, &root);

        let result = coordinator.assign_role(&ctx, role.id, 999).await;
        assert!(matches!(
            result,
            Err(InternalError::Entity(EntityError::EntityNotFound { .. }))
        ));
    }
}
