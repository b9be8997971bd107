use std::fmt;

use crate::errors::internal::AuthorizationError;
use crate::types::internal::auth::Claims;
use crate::types::internal::graph::UserId;
use crate::types::internal::level::Level;

/// The authenticated identity making a request
///
/// Built from validated JWT claims. `claimed_level` is what the token says;
/// authorization decisions always re-resolve the level from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub username: String,
    pub claimed_level: Level,
}

impl Principal {
    pub fn new(user_id: UserId, username: impl Into<String>, claimed_level: Level) -> Self {
        Self {
            user_id,
            username: username.into(),
            claimed_level,
        }
    }

    /// Convert claims into a principal
    ///
    /// A missing or malformed level claim is never defaulted to `user`.
    pub fn from_claims(claims: &Claims) -> Result<Self, AuthorizationError> {
        let user_id: UserId = claims.sub.parse().map_err(|_| {
            AuthorizationError::principal_unresolved(format!("subject '{}' is not a user id", claims.sub))
        })?;

        let raw_level = claims
            .level
            .as_deref()
            .or(claims.role.as_deref())
            .ok_or_else(|| AuthorizationError::principal_unresolved("claims carry no level"))?;

        let claimed_level = raw_level
            .parse::<Level>()
            .map_err(|e| AuthorizationError::principal_unresolved(e.to_string()))?;

        Ok(Self {
            user_id,
            username: claims.username.clone(),
            claimed_level,
        })
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.username, self.user_id)
    }
}
