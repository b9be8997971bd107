use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username for authentication
    pub username: String,

    /// Password for authentication
    pub password: String,
}

/// Response model containing the access token
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,

    pub user_id: i32,
    pub username: String,

    /// Level at the time of issue
    pub level: String,
}

/// Response model for whoami endpoint
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub user_id: i32,
    pub username: String,

    /// Current stored level, not the level claimed by the token
    pub level: String,

    /// Token expiration time (Unix timestamp)
    pub expires_at: i64,
}

/// Effective permission codes of the caller
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct PermissionsResponse {
    pub level: String,

    /// True when the caller is super_admin and every code is allowed
    pub unrestricted: bool,

    pub codes: Vec<String>,
}

/// Authorization decision for one code
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    pub code: String,
    pub allowed: bool,
    pub reason: String,
}
