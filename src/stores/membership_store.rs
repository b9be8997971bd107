use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};

use crate::errors::InternalError;
use crate::types::db::{permission, role, role_permission, user, user_role};
use crate::types::internal::graph::{PermissionRecord, RoleRecord, STATUS_ACTIVE, UserRecord};
use crate::types::internal::{MembershipChange, PermissionId, RoleId, UserId};

/// The two join relations and the traversals across them.
///
/// Inserts are `ON CONFLICT DO NOTHING` on the composite key and deletes are
/// keyed on both columns, so concurrent assign/revoke of one pair never fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct MembershipStore;

impl MembershipStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn add_user_role(
        &self,
        conn: &impl ConnectionTrait,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<MembershipChange, InternalError> {
        let row = user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
            created_at: Set(Utc::now().timestamp()),
        };

        let inserted = user_role::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([user_role::Column::UserId, user_role::Column::RoleId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("add_user_role", e))?;

        Ok(if inserted > 0 {
            MembershipChange::Created
        } else {
            MembershipChange::Unchanged
        })
    }

    pub async fn remove_user_role(
        &self,
        conn: &impl ConnectionTrait,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<MembershipChange, InternalError> {
        let result = user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleId.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("remove_user_role", e))?;

        Ok(removed(result.rows_affected))
    }

    pub async fn has_user_role(
        &self,
        conn: &impl ConnectionTrait,
        user_id: UserId,
        role_id: RoleId,
    ) -> Result<bool, InternalError> {
        let row = user_role::Entity::find_by_id((user_id, role_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("has_user_role", e))?;
        Ok(row.is_some())
    }

    pub async fn add_role_permission(
        &self,
        conn: &impl ConnectionTrait,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<MembershipChange, InternalError> {
        let row = role_permission::ActiveModel {
            role_id: Set(role_id),
            permission_id: Set(permission_id),
            created_at: Set(Utc::now().timestamp()),
        };

        let inserted = role_permission::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    role_permission::Column::RoleId,
                    role_permission::Column::PermissionId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| InternalError::database("add_role_permission", e))?;

        Ok(if inserted > 0 {
            MembershipChange::Created
        } else {
            MembershipChange::Unchanged
        })
    }

    pub async fn remove_role_permission(
        &self,
        conn: &impl ConnectionTrait,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<MembershipChange, InternalError> {
        let result = role_permission::Entity::delete_many()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .filter(role_permission::Column::PermissionId.eq(permission_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("remove_role_permission", e))?;

        Ok(removed(result.rows_affected))
    }

    pub async fn has_role_permission(
        &self,
        conn: &impl ConnectionTrait,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<bool, InternalError> {
        let row = role_permission::Entity::find_by_id((role_id, permission_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("has_role_permission", e))?;
        Ok(row.is_some())
    }

    /// Non-deleted roles held by a user, inactive ones included
    pub async fn roles_of_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: UserId,
    ) -> Result<Vec<RoleRecord>, InternalError> {
        role::Entity::find()
            .join(JoinType::InnerJoin, role::Relation::UserRole.def())
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(role::Column::DeletedAt.is_null())
            .order_by_asc(role::Column::Name)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("roles_of_user", e))
    }

    pub async fn users_of_role(
        &self,
        conn: &impl ConnectionTrait,
        role_id: RoleId,
    ) -> Result<Vec<UserRecord>, InternalError> {
        user::Entity::find()
            .join(JoinType::InnerJoin, user::Relation::UserRole.def())
            .filter(user_role::Column::RoleId.eq(role_id))
            .filter(user::Column::DeletedAt.is_null())
            .order_by_asc(user::Column::Id)
            .into_model::<UserRecord>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("users_of_role", e))
    }

    pub async fn permissions_of_role(
        &self,
        conn: &impl ConnectionTrait,
        role_id: RoleId,
    ) -> Result<Vec<PermissionRecord>, InternalError> {
        permission::Entity::find()
            .join(JoinType::InnerJoin, permission::Relation::RolePermission.def())
            .filter(role_permission::Column::RoleId.eq(role_id))
            .filter(permission::Column::DeletedAt.is_null())
            .order_by_asc(permission::Column::Code)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("permissions_of_role", e))
    }

    pub async fn roles_of_permission(
        &self,
        conn: &impl ConnectionTrait,
        permission_id: PermissionId,
    ) -> Result<Vec<RoleRecord>, InternalError> {
        role::Entity::find()
            .join(JoinType::InnerJoin, role::Relation::RolePermission.def())
            .filter(role_permission::Column::PermissionId.eq(permission_id))
            .filter(role::Column::DeletedAt.is_null())
            .order_by_asc(role::Column::Name)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("roles_of_permission", e))
    }

    /// Effective permission set of a user in a single statement.
    ///
    /// Only non-deleted, active roles and permissions contribute. The result
    /// is distinct and ordered by code.
    pub async fn permissions_of_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: UserId,
    ) -> Result<Vec<PermissionRecord>, InternalError> {
        permission::Entity::find()
            .distinct()
            .join(JoinType::InnerJoin, permission::Relation::RolePermission.def())
            .join(JoinType::InnerJoin, role_permission::Relation::Role.def())
            .join(JoinType::InnerJoin, role::Relation::UserRole.def())
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(role::Column::DeletedAt.is_null())
            .filter(role::Column::Status.eq(STATUS_ACTIVE))
            .filter(permission::Column::DeletedAt.is_null())
            .filter(permission::Column::Status.eq(STATUS_ACTIVE))
            .order_by_asc(permission::Column::Code)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("permissions_of_user", e))
    }
}

fn removed(rows_affected: u64) -> MembershipChange {
    if rows_affected > 0 {
        MembershipChange::Removed
    } else {
        MembershipChange::Unchanged
    }
}
