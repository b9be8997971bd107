use poem_openapi::Object;

use crate::types::internal::graph::UserRecord;

#[derive(Object, Debug)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,

    /// `user`, `admin` or `super_admin`; defaults to `user`
    pub level: Option<String>,
}

/// Partial update; omitted fields are left unchanged
#[derive(Object, Debug)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Object, Debug)]
pub struct SetLevelRequest {
    pub level: String,
}

#[derive(Object, Debug)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub level: String,

    /// Unix timestamp of the last successful login
    pub last_login_at: Option<i64>,

    pub created_at: i64,
    pub updated_at: i64,
}

impl From<UserRecord> for UserResponse {
    fn from(u: UserRecord) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            level: u.level,
            last_login_at: u.last_login_at,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}
