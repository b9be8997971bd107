use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::EntityError;
use crate::stores::EntityGraph;
use crate::types::internal::graph::{NewRole, RoleRecord, RoleUpdate, STATUS_ACTIVE, STATUS_INACTIVE};
use crate::types::internal::{Level, Principal, RoleId};

#[derive(Debug, Clone)]
pub struct CreateRoleInput {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub is_system: bool,
}

/// Role lifecycle; system roles are reserved to super_admin
pub struct RoleProvider {
    graph: Arc<dyn EntityGraph>,
}

impl RoleProvider {
    pub fn new(graph: Arc<dyn EntityGraph>) -> Self {
        Self { graph }
    }

    pub async fn create_role(
        &self,
        caller: &Principal,
        caller_level: Level,
        input: CreateRoleInput,
    ) -> Result<RoleRecord, InternalError> {
        validate_role_name(&input.name)?;
        if input.is_system && caller_level != Level::SuperAdmin {
            return Err(EntityError::SystemRoleProtected { name: input.name }.into());
        }

        let display_name = if input.display_name.trim().is_empty() {
            input.name.clone()
        } else {
            input.display_name
        };

        self.graph
            .create_role(NewRole {
                name: input.name,
                display_name,
                description: input.description,
                is_system: input.is_system,
                created_by: Some(caller.user_id),
            })
            .await
    }

    pub async fn update_role(
        &self,
        caller_level: Level,
        id: RoleId,
        changes: RoleUpdate,
    ) -> Result<RoleRecord, InternalError> {
        let current = self.graph.get_role(id).await?;
        ensure_may_modify(&current, caller_level)?;

        if let Some(name) = &changes.name {
            validate_role_name(name)?;
        }
        if let Some(status) = &changes.status {
            validate_status(status)?;
        }

        self.graph.update_role(id, changes).await
    }

    pub async fn delete_role(&self, caller_level: Level, id: RoleId) -> Result<(), InternalError> {
        let current = self.graph.get_role(id).await?;
        ensure_may_modify(&current, caller_level)?;

        self.graph.delete_role(id).await
    }
}

fn ensure_may_modify(role: &RoleRecord, caller_level: Level) -> Result<(), EntityError> {
    if role.is_system && caller_level != Level::SuperAdmin {
        return Err(EntityError::SystemRoleProtected { name: role.name.clone() });
    }
    Ok(())
}

fn validate_role_name(name: &str) -> Result<(), EntityError> {
    if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
        return Err(EntityError::invalid_field("name", "must be non-empty without whitespace"));
    }
    Ok(())
}

pub(crate) fn validate_status(status: &str) -> Result<(), EntityError> {
    if status != STATUS_ACTIVE && status != STATUS_INACTIVE {
        return Err(EntityError::invalid_field(
            "status",
            format!("'{}' is not one of active, inactive", status),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::DatabaseEntityGraph;
    use crate::test::utils::{new_user, setup_test_graph};

    async fn setup() -> (Arc<DatabaseEntityGraph>, RoleProvider, Principal) {
        let graph = setup_test_graph().await;
        let root = graph.create_user(new_user("root", Level::SuperAdmin)).await.unwrap();
        let provider = RoleProvider::new(graph.clone());
        (graph, provider, Principal::new(root.id, "root", Level::SuperAdmin))
    }

    fn input(name: &str, is_system: bool) -> CreateRoleInput {
        CreateRoleInput {
            name: name.to_string(),
            display_name: String::new(),
            description: "test role".to_string(),
            is_system,
        }
    }

    #[tokio::test]
    async fn test_create_role_records_creator_and_defaults_display_name() {
        let (_graph, roles, root) = setup().await;

        let role = roles.create_role(&root, Level::SuperAdmin, input("hr_manager", false)).await.unwrap();

        assert_eq!(role.display_name, "hr_manager");
        assert_eq!(role.created_by, Some(root.user_id));
        assert_eq!(role.status, STATUS_ACTIVE);
    }

    #[tokio::test]
    async fn test_duplicate_role_name_rejected() {
        let (_graph, roles, root) = setup().await;
        roles.create_role(&root, Level::SuperAdmin, input("viewer", false)).await.unwrap();

        let result = roles.create_role(&root, Level::SuperAdmin, input("viewer", false)).await;

        assert!(matches!(
            result,
            Err(InternalError::Entity(EntityError::DuplicateRoleName { .. }))
        ));
    }

    #[tokio::test]
    async fn test_system_role_reserved_to_super_admin() {
        let (_graph, roles, root) = setup().await;
        let system = roles.create_role(&root, Level::SuperAdmin, input("auditor", true)).await.unwrap();

        let admin = Principal::new(2, "admin", Level::Admin);
        let create = roles.create_role(&admin, Level::Admin, input("other_system", true)).await;
        assert!(matches!(
            create,
            Err(InternalError::Entity(EntityError::SystemRoleProtected { .. }))
        ));

        let rename = roles
            .update_role(
                Level::Admin,
                system.id,
                RoleUpdate {
                    name: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(
            rename,
            Err(InternalError::Entity(EntityError::SystemRoleProtected { .. }))
        ));

        assert!(roles.delete_role(Level::Admin, system.id).await.is_err());
        roles.delete_role(Level::SuperAdmin, system.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_status_rejected() {
        let (_graph, roles, root) = setup().await;
        let role = roles.create_role(&root, Level::SuperAdmin, input("viewer", false)).await.unwrap();

        let result = roles
            .update_role(
                Level::SuperAdmin,
                role.id,
                RoleUpdate {
                    status: Some("paused".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(InternalError::Entity(EntityError::InvalidField { .. }))
        ));
    }
}
