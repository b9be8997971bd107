mod common;

use std::sync::Arc;

use erp_admin_backend::types::internal::{Level, MembershipChange};

#[tokio::test]
async fn test_concurrent_assign_role_creates_one_membership() {
    let app_data = common::setup_app_data().await;
    let user = common::seed_user(&app_data, "racer", Level::User).await;
    let role = app_data.graph.create_role(common::role("racers")).await.unwrap();
    let (user_id, role_id) = (user.id, role.id);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app_data = Arc::clone(&app_data);
        handles.push(tokio::spawn(async move {
            app_data.assignment_provider.assign_role(user_id, role_id).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() == MembershipChange::Created {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(app_data.graph.roles_of_user(user.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_grant_and_check_never_errors() {
    let app_data = common::setup_app_data().await;
    let user = common::seed_user(&app_data, "reader", Level::User).await;
    let role = app_data.graph.create_role(common::role("readers")).await.unwrap();
    let perm = app_data
        .graph
        .create_permission(common::permission("inventory", "stock", "view"))
        .await
        .unwrap();
    app_data.graph.add_user_role(user.id, role.id).await.unwrap();

    let ctx = common::context_for(&app_data, &user);
    let principal = ctx.principal().unwrap();

    let (role_id, permission_id) = (role.id, perm.id);
    let writer = {
        let app_data = Arc::clone(&app_data);
        tokio::spawn(async move {
            for _ in 0..5 {
                app_data.assignment_provider.assign_permission(role_id, permission_id).await.unwrap();
                app_data.assignment_provider.revoke_permission(role_id, permission_id).await.unwrap();
            }
            app_data.assignment_provider.assign_permission(role_id, permission_id).await.unwrap();
        })
    };

    for _ in 0..10 {
        app_data
            .authorization_provider
            .authorize(&principal, "inventory.stock.view")
            .await
            .unwrap();
    }

    writer.await.unwrap();
    let decision = app_data
        .authorization_provider
        .authorize(&principal, "inventory.stock.view")
        .await
        .unwrap();
    assert!(decision.is_allowed());
}
