use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::errors::InternalError;
use crate::errors::internal::{EntityError, EntityKind};
use crate::stores::unique_violation;
use crate::types::db::role;
use crate::types::internal::RoleId;
use crate::types::internal::graph::{NewRole, RoleRecord, RoleUpdate, STATUS_ACTIVE};

#[derive(Debug, Default, Clone, Copy)]
pub struct RoleStore;

impl RoleStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert(&self, conn: &impl ConnectionTrait, new_role: NewRole) -> Result<RoleRecord, InternalError> {
        let now = Utc::now().timestamp();
        let name = new_role.name.clone();
        let model = role::ActiveModel {
            id: NotSet,
            name: Set(new_role.name),
            display_name: Set(new_role.display_name),
            description: Set(new_role.description),
            is_system: Set(new_role.is_system),
            status: Set(STATUS_ACTIVE.to_string()),
            created_by: Set(new_role.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| duplicate_or_database("insert_role", e, &name))
    }

    pub async fn get(&self, conn: &impl ConnectionTrait, id: RoleId) -> Result<RoleRecord, InternalError> {
        role::Entity::find_by_id(id)
            .filter(role::Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_role", e))?
            .ok_or_else(|| InternalError::not_found(EntityKind::Role, id))
    }

    pub async fn find_by_name(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Option<RoleRecord>, InternalError> {
        role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .filter(role::Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_role_by_name", e))
    }

    pub async fn list(&self, conn: &impl ConnectionTrait) -> Result<Vec<RoleRecord>, InternalError> {
        role::Entity::find()
            .filter(role::Column::DeletedAt.is_null())
            .order_by_asc(role::Column::Name)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_roles", e))
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        id: RoleId,
        changes: RoleUpdate,
    ) -> Result<RoleRecord, InternalError> {
        let current = self.get(conn, id).await?;
        let name = changes.name.clone().unwrap_or_else(|| current.name.clone());

        let mut active: role::ActiveModel = current.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
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
            .map_err(|e| duplicate_or_database("update_role", e, &name))
    }

    pub async fn soft_delete(&self, conn: &impl ConnectionTrait, id: RoleId) -> Result<(), InternalError> {
        let current = self.get(conn, id).await?;
        let now = Utc::now().timestamp();

        let mut active: role::ActiveModel = current.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("delete_role", e))?;
        Ok(())
    }
}

fn duplicate_or_database(operation: &str, err: sea_orm::DbErr, name: &str) -> InternalError {
    match unique_violation(&err) {
        Some(_) => EntityError::DuplicateRoleName { name: name.to_string() }.into(),
        None => InternalError::database(operation, err),
    }
}
