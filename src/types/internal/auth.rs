use serde::{Deserialize, Serialize};

/// JWT claims issued at login and consumed by the authorization layer
///
/// `level` is the current claim; `role` is the legacy claim name older
/// tokens carried the same value under. Both are kept as raw strings so a
/// malformed value surfaces as an unresolved principal instead of a decode
/// failure being mistaken for a lower level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id, decimal)
    pub sub: String,

    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// JWT ID
    pub jti: String,
}
