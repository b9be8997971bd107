mod common;

use std::sync::Arc;

use erp_admin_backend::coordinators::{AdminCoordinator, LoginCoordinator, UserCoordinator};
use erp_admin_backend::errors::{AdminError, InternalError};
use erp_admin_backend::errors::internal::{AssignmentError, AuthorizationError, CredentialError};
use erp_admin_backend::providers::role_provider::CreateRoleInput;
use erp_admin_backend::providers::user_provider::CreateUserInput;
use erp_admin_backend::types::internal::context::RequestContext;
use erp_admin_backend::types::internal::graph::BOOTSTRAP_USER_ID;
use erp_admin_backend::types::internal::{Level, MembershipChange};

/// Bootstrap, log in through the coordinator and return an authenticated context
async fn bootstrap_and_login(app_data: &Arc<erp_admin_backend::AppData>) -> RequestContext {
    app_data
        .user_provider
        .bootstrap_super_admin("root".to_string(), "root@example.com".to_string(), "root-password-123")
        .await
        .unwrap();

    let login = LoginCoordinator::new(Arc::clone(app_data));
    let outcome = login
        .login(&RequestContext::for_api(None), "root", "root-password-123")
        .await
        .unwrap();
    assert_eq!(outcome.user_id, BOOTSTRAP_USER_ID);
    assert_eq!(outcome.level, Level::SuperAdmin);

    let claims = app_data.token_provider.validate_jwt(&outcome.token.token).unwrap();
    RequestContext::for_api(None).with_auth(claims)
}

#[tokio::test]
async fn test_login_stamps_last_login_and_rejects_bad_password() {
    let app_data = common::setup_app_data().await;
    bootstrap_and_login(&app_data).await;

    let root = app_data.graph.get_user(BOOTSTRAP_USER_ID).await.unwrap();
    assert!(root.last_login_at.is_some());

    let login = LoginCoordinator::new(Arc::clone(&app_data));
    let result = login.login(&RequestContext::for_api(None), "root", "wrong-password").await;
    assert!(matches!(
        result,
        Err(InternalError::Credential(CredentialError::InvalidCredentials))
    ));

    let unknown = login.login(&RequestContext::for_api(None), "nobody", "whatever-pass").await;
    assert!(matches!(
        unknown,
        Err(InternalError::Credential(CredentialError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn test_role_grant_and_revoke_drive_authorization() {
    let app_data = common::setup_app_data().await;
    let root_ctx = bootstrap_and_login(&app_data).await;

    let users = UserCoordinator::new(Arc::clone(&app_data));
    let admin = AdminCoordinator::new(Arc::clone(&app_data));

    let clerk = users
        .create_user(
            &root_ctx,
            CreateUserInput {
                username: "clerk".to_string(),
                email: "clerk@example.com".to_string(),
                password: "clerk-password".to_string(),
                level: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(clerk.level, "user");
    let clerk_ctx = common::context_for(&app_data, &clerk);

    // No roles yet
    assert!(!users.check(&clerk_ctx, "hr.employees.view").await.unwrap().is_allowed());

    let role = admin
        .create_role(
            &root_ctx,
            CreateRoleInput {
                name: "hr_viewer".to_string(),
                display_name: String::new(),
                description: "Read-only HR".to_string(),
                is_system: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(role.display_name, "hr_viewer");

    let perm = admin
        .create_permission(&root_ctx, common::permission("hr", "employees", "view"))
        .await
        .unwrap();
    assert_eq!(perm.code, "hr.employees.view");

    admin.grant_permission(&root_ctx, perm.id, role.id).await.unwrap();
    assert_eq!(
        admin.assign_role(&root_ctx, role.id, clerk.id).await.unwrap(),
        MembershipChange::Created
    );
    assert_eq!(
        admin.assign_role(&root_ctx, role.id, clerk.id).await.unwrap(),
        MembershipChange::Unchanged
    );
    assert_eq!(admin.users_of_role(&root_ctx, role.id).await.unwrap().len(), 1);

    assert!(users.check(&clerk_ctx, "hr.employees.view").await.unwrap().is_allowed());
    assert!(!users.check(&clerk_ctx, "hr.employees.delete").await.unwrap().is_allowed());

    admin.revoke_role(&root_ctx, role.id, clerk.id).await.unwrap();
    assert!(!users.check(&clerk_ctx, "hr.employees.view").await.unwrap().is_allowed());

    // Revoking an absent pair still succeeds
    assert_eq!(
        admin.revoke_role(&root_ctx, role.id, clerk.id).await.unwrap(),
        MembershipChange::Unchanged
    );
}

#[tokio::test]
async fn test_bootstrap_identity_cannot_be_demoted() {
    let app_data = common::setup_app_data().await;
    let root_ctx = bootstrap_and_login(&app_data).await;
    let users = UserCoordinator::new(Arc::clone(&app_data));

    for requested in ["admin", "user"] {
        let result = users.set_level(&root_ctx, BOOTSTRAP_USER_ID, requested).await;
        assert!(matches!(
            result,
            Err(InternalError::Assignment(AssignmentError::SelfLockoutRejected { .. }))
        ));
    }

    let root = app_data.graph.get_user(BOOTSTRAP_USER_ID).await.unwrap();
    assert_eq!(root.level, "super_admin");

    // Re-asserting super_admin is a no-op, not a rejection
    let unchanged = users.set_level(&root_ctx, BOOTSTRAP_USER_ID, "super_admin").await.unwrap();
    assert_eq!(unchanged.level, "super_admin");
}

#[tokio::test]
async fn test_admin_cannot_escalate_beyond_own_level() {
    let app_data = common::setup_app_data().await;
    bootstrap_and_login(&app_data).await;
    let admin_user = common::seed_user(&app_data, "ops", Level::Admin).await;
    let target = common::seed_user(&app_data, "intern", Level::User).await;
    let ctx = common::context_for(&app_data, &admin_user);

    let users = UserCoordinator::new(Arc::clone(&app_data));

    let result = users.set_level(&ctx, target.id, "super_admin").await;
    assert!(matches!(
        result,
        Err(InternalError::Authorization(AuthorizationError::PermissionDenied { .. }))
    ));

    let promoted = users.set_level(&ctx, target.id, "admin").await.unwrap();
    assert_eq!(promoted.level, "admin");
}

#[tokio::test]
async fn test_module_scoped_admin_access() {
    let app_data = common::setup_app_data().await;
    bootstrap_and_login(&app_data).await;
    let graph = &app_data.graph;

    let finance_admin = common::seed_user(&app_data, "fin", Level::Admin).await;
    let role = graph.create_role(common::role("finance_admins")).await.unwrap();
    let budget = graph.create_permission(common::permission("finance", "budget", "view")).await.unwrap();
    let hr_delete = graph.create_permission(common::permission("hr", "employees", "delete")).await.unwrap();
    graph.add_role_permission(role.id, budget.id).await.unwrap();
    graph.add_user_role(finance_admin.id, role.id).await.unwrap();

    let users = UserCoordinator::new(Arc::clone(&app_data));
    let ctx = common::context_for(&app_data, &finance_admin);

    assert!(users.check(&ctx, "finance.budget.manage").await.unwrap().is_allowed());
    assert!(!users.check(&ctx, "hr.employees.delete").await.unwrap().is_allowed());

    graph.add_role_permission(role.id, hr_delete.id).await.unwrap();
    assert!(users.check(&ctx, "hr.employees.delete").await.unwrap().is_allowed());
}

#[tokio::test]
async fn test_errors_map_to_http_statuses() {
    let app_data = common::setup_app_data().await;
    let root_ctx = bootstrap_and_login(&app_data).await;
    let users = UserCoordinator::new(Arc::clone(&app_data));

    let lockout = users
        .set_level(&root_ctx, BOOTSTRAP_USER_ID, "user")
        .await
        .unwrap_err();
    assert_eq!(AdminError::from(lockout).status_code(), 403);

    let invalid = users.set_level(&root_ctx, BOOTSTRAP_USER_ID, "superuser").await.unwrap_err();
    assert_eq!(AdminError::from(invalid).status_code(), 400);

    let missing = users.get_user(&root_ctx, 4242).await.unwrap_err();
    assert_eq!(AdminError::from(missing).status_code(), 404);

    let anonymous = users.list_users(&RequestContext::for_api(None)).await.unwrap_err();
    assert_eq!(AdminError::from(anonymous).status_code(), 401);
}
