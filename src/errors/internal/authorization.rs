use thiserror::Error;

use crate::types::internal::UserId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// Claims missing or unparseable, or the user behind them is gone
    #[error("Principal could not be resolved: {reason}")]
    PrincipalUnresolved { reason: String },

    /// Full evaluation finished without a grant
    #[error("Permission denied for user {user_id}: requires {required}")]
    PermissionDenied { user_id: UserId, required: String },
}

impl AuthorizationError {
    pub fn principal_unresolved(reason: impl Into<String>) -> Self {
        Self::PrincipalUnresolved {
            reason: reason.into(),
        }
    }

    pub fn permission_denied(user_id: UserId, required: impl Into<String>) -> Self {
        Self::PermissionDenied {
            user_id,
            required: required.into(),
        }
    }
}
