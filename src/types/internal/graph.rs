use sea_orm::FromQueryResult;

use crate::types::db::{permission, role, user};
use crate::types::internal::level::{Level, UnknownLevel};

pub type UserId = i32;
pub type RoleId = i32;
pub type PermissionId = i32;

/// The first-created account; protected against lockout
pub const BOOTSTRAP_USER_ID: UserId = 1;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";

pub type RoleRecord = role::Model;
pub type PermissionRecord = permission::Model;

/// User projection without credential material
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub level: String,
    pub last_login_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl UserRecord {
    /// Parse the stored level
    pub fn level(&self) -> Result<Level, UnknownLevel> {
        self.level.parse()
    }

    pub fn is_bootstrap(&self) -> bool {
        self.id == BOOTSTRAP_USER_ID
    }
}

impl From<user::Model> for UserRecord {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            level: u.level,
            last_login_at: u.last_login_at,
            created_at: u.created_at,
            updated_at: u.updated_at,
            deleted_at: u.deleted_at,
        }
    }
}

/// Minimal user data needed to verify a login
#[derive(Debug, Clone, FromQueryResult)]
pub struct UserForAuth {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub level: Level,
}

/// Partial update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub is_system: bool,
    pub created_by: Option<UserId>,
}

#[derive(Debug, Clone, Default)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// A permission to insert; `code` is always derived from the three segments
#[derive(Debug, Clone)]
pub struct NewPermission {
    pub module_name: String,
    pub resource: String,
    pub action: String,
    pub display_name: String,
    pub description: String,
    pub auto_registered: bool,
}

impl NewPermission {
    pub fn code(&self) -> String {
        compose_code(&self.module_name, &self.resource, &self.action)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PermissionUpdate {
    pub module_name: Option<String>,
    pub resource: Option<String>,
    pub action: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl PermissionUpdate {
    pub fn touches_code(&self) -> bool {
        self.module_name.is_some() || self.resource.is_some() || self.action.is_some()
    }
}

pub fn compose_code(module_name: &str, resource: &str, action: &str) -> String {
    format!("{}.{}.{}", module_name, resource, action)
}

/// Outcome of an idempotent membership mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    Created,
    Removed,
    Unchanged,
}

impl MembershipChange {
    pub fn changed(&self) -> bool {
        !matches!(self, MembershipChange::Unchanged)
    }
}
