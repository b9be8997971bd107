use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::errors::InternalError;
use crate::errors::internal::{EntityError, EntityKind};
use crate::stores::unique_violation;
use crate::types::db::user;
use crate::types::internal::{Level, UserId};
use crate::types::internal::graph::{NewUser, UserForAuth, UserRecord, UserUpdate};

/// Users table access. Reads exclude soft-deleted rows unless stated otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserStore;

impl UserStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        new_user: NewUser,
    ) -> Result<UserRecord, InternalError> {
        let now = Utc::now().timestamp();
        let model = user::ActiveModel {
            id: NotSet,
            username: Set(new_user.username.clone()),
            email: Set(new_user.email.clone()),
            password_hash: Set(new_user.password_hash),
            level: Set(new_user.level.as_str().to_string()),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let inserted = model
            .insert(conn)
            .await
            .map_err(|e| duplicate_or_database("insert_user", e, &new_user.username, &new_user.email))?;

        Ok(inserted.into())
    }

    /// Live user by id
    pub async fn get(&self, conn: &impl ConnectionTrait, id: UserId) -> Result<UserRecord, InternalError> {
        self.find_live_model(conn, id)
            .await?
            .map(UserRecord::from)
            .ok_or_else(|| InternalError::not_found(EntityKind::User, id))
    }

    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<UserRecord>, InternalError> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::DeletedAt.is_null())
            .into_model::<UserRecord>()
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_user_by_username", e))?;
        Ok(found)
    }

    pub async fn list(&self, conn: &impl ConnectionTrait) -> Result<Vec<UserRecord>, InternalError> {
        user::Entity::find()
            .filter(user::Column::DeletedAt.is_null())
            .order_by_asc(user::Column::Id)
            .into_model::<UserRecord>()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    /// Counts every row, soft-deleted included
    pub async fn count_all(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        user::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_users", e))
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        id: UserId,
        changes: UserUpdate,
    ) -> Result<UserRecord, InternalError> {
        let current = self
            .find_live_model(conn, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::User, id))?;

        let username = changes.username.clone().unwrap_or_else(|| current.username.clone());
        let email = changes.email.clone().unwrap_or_else(|| current.email.clone());

        let mut active: user::ActiveModel = current.into();
        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(password_hash) = changes.password_hash {
            active.password_hash = Set(password_hash);
        }
        active.updated_at = Set(Utc::now().timestamp());

        let updated = active
            .update(conn)
            .await
            .map_err(|e| duplicate_or_database("update_user", e, &username, &email))?;
        Ok(updated.into())
    }

    pub async fn set_level(
        &self,
        conn: &impl ConnectionTrait,
        id: UserId,
        level: Level,
    ) -> Result<UserRecord, InternalError> {
        let current = self
            .find_live_model(conn, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::User, id))?;

        let mut active: user::ActiveModel = current.into();
        active.level = Set(level.as_str().to_string());
        active.updated_at = Set(Utc::now().timestamp());

        let updated = active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_user_level", e))?;
        Ok(updated.into())
    }

    pub async fn soft_delete(&self, conn: &impl ConnectionTrait, id: UserId) -> Result<(), InternalError> {
        let current = self
            .find_live_model(conn, id)
            .await?
            .ok_or_else(|| InternalError::not_found(EntityKind::User, id))?;

        let now = Utc::now().timestamp();
        let mut active: user::ActiveModel = current.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;
        Ok(())
    }

    /// Login lookup; soft-deleted users yield `None`
    pub async fn credentials_for_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<UserForAuth>, InternalError> {
        user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::DeletedAt.is_null())
            .select_only()
            .column(user::Column::Id)
            .column(user::Column::Username)
            .column(user::Column::PasswordHash)
            .column(user::Column::Level)
            .into_model::<UserForAuth>()
            .one(conn)
            .await
            .map_err(|e| InternalError::database("credentials_for_username", e))
    }

    pub async fn touch_last_login(&self, conn: &impl ConnectionTrait, id: UserId) -> Result<(), InternalError> {
        let now = Utc::now().timestamp();
        user::Entity::update_many()
            .col_expr(user::Column::LastLoginAt, sea_orm::sea_query::Expr::value(now))
            .filter(user::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("touch_last_login", e))?;
        Ok(())
    }

    async fn find_live_model(
        &self,
        conn: &impl ConnectionTrait,
        id: UserId,
    ) -> Result<Option<user::Model>, InternalError> {
        user::Entity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_user", e))
    }
}

fn duplicate_or_database(operation: &str, err: sea_orm::DbErr, username: &str, email: &str) -> InternalError {
    match unique_violation(&err) {
        Some(message) if message.contains("email") => EntityError::DuplicateEmail {
            email: email.to_string(),
        }
        .into(),
        Some(_) => EntityError::DuplicateUsername {
            username: username.to_string(),
        }
        .into(),
        None => InternalError::database(operation, err),
    }
}
