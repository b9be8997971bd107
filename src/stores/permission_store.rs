use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

use crate::errors::InternalError;
use crate::errors::internal::{EntityError, EntityKind};
use crate::stores::unique_violation;
use crate::types::db::{permission, role_permission};
use crate::types::internal::PermissionId;
use crate::types::internal::graph::{
    NewPermission, PermissionRecord, PermissionUpdate, STATUS_ACTIVE, compose_code,
};

/// Permissions table access. The `code` column is always written as the
/// composition of the three segment columns.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissionStore;

impl PermissionStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        new_permission: NewPermission,
    ) -> Result<PermissionRecord, InternalError> {
        let now = Utc::now().timestamp();
        let code = new_permission.code();
        let registered_at = new_permission.auto_registered.then_some(now);
        let model = permission::ActiveModel {
            id: NotSet,
            module_name: Set(new_permission.module_name),
            resource: Set(new_permission.resource),
            action: Set(new_permission.action),
            code: Set(code.clone()),
            display_name: Set(new_permission.display_name),
            description: Set(new_permission.description),
            status: Set(STATUS_ACTIVE.to_string()),
            auto_registered: Set(new_permission.auto_registered),
            registered_at: Set(registered_at),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| duplicate_or_database("insert_permission", e, &code))
    }

    pub async fn get(&self, conn: &impl ConnectionTrait, id: PermissionId) -> Result<PermissionRecord, InternalError> {
        permission::Entity::find_by_id(id)
            .filter(permission::Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_permission", e))?
            .ok_or_else(|| InternalError::not_found(EntityKind::Permission, id))
    }

    pub async fn find_by_code(
        &self,
        conn: &impl ConnectionTrait,
        code: &str,
    ) -> Result<Option<PermissionRecord>, InternalError> {
        permission::Entity::find()
            .filter(permission::Column::Code.eq(code))
            .filter(permission::Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_permission_by_code", e))
    }

    pub async fn list(&self, conn: &impl ConnectionTrait) -> Result<Vec<PermissionRecord>, InternalError> {
        permission::Entity::find()
            .filter(permission::Column::DeletedAt.is_null())
            .order_by_asc(permission::Column::Code)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_permissions", e))
    }

    /// Number of roles granting this permission, deleted roles included
    pub async fn count_role_references(
        &self,
        conn: &impl ConnectionTrait,
        id: PermissionId,
    ) -> Result<u64, InternalError> {
        role_permission::Entity::find()
            .filter(role_permission::Column::PermissionId.eq(id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_role_references", e))
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        current: PermissionRecord,
        changes: PermissionUpdate,
    ) -> Result<PermissionRecord, InternalError> {
        let module_name = changes.module_name.clone().unwrap_or_else(|| current.module_name.clone());
        let resource = changes.resource.clone().unwrap_or_else(|| current.resource.clone());
        let action = changes.action.clone().unwrap_or_else(|| current.action.clone());
        let code = compose_code(&module_name, &resource, &action);

        let mut active: permission::ActiveModel = current.into();
        if changes.touches_code() {
            active.module_name = Set(module_name);
            active.resource = Set(resource);
            active.action = Set(action);
            active.code = Set(code.clone());
        }
        if let Some(display_name) = changes.display_name {
            active.display_name = Set(display_name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(conn)
            .await
            .map_err(|e| duplicate_or_database("update_permission", e, &code))
    }

    pub async fn soft_delete(&self, conn: &impl ConnectionTrait, id: PermissionId) -> Result<(), InternalError> {
        let current = self.get(conn, id).await?;
        let now = Utc::now().timestamp();

        let mut active: permission::ActiveModel = current.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("delete_permission", e))?;
        Ok(())
    }
}

fn duplicate_or_database(operation: &str, err: sea_orm::DbErr, code: &str) -> InternalError {
    match unique_violation(&err) {
        Some(_) => EntityError::DuplicateCode { code: code.to_string() }.into(),
        None => InternalError::database(operation, err),
    }
}
