use std::fmt;

use crate::errors::internal::AuthorizationError;
use crate::types::internal::level::Level;
use crate::types::internal::principal::Principal;

/// Why a request was allowed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowReason {
    SuperAdmin,
    ModuleGrant { module: String },
    RolePermission,
    LevelMatched(Level),
}

/// Why a request was denied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    PrincipalUnresolved { reason: String },
    PermissionDenied,
}

/// Allow/deny outcome of an authorization check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow(AllowReason),
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }

    pub(crate) fn unresolved(reason: impl Into<String>) -> Self {
        Decision::Deny(DenyReason::PrincipalUnresolved {
            reason: reason.into(),
        })
    }

    /// Turn a deny into a typed error naming what was required
    pub fn into_result(self, principal: &Principal, required: impl Into<String>) -> Result<(), AuthorizationError> {
        match self {
            Decision::Allow(_) => Ok(()),
            Decision::Deny(DenyReason::PrincipalUnresolved { reason }) => {
                Err(AuthorizationError::PrincipalUnresolved { reason })
            }
            Decision::Deny(DenyReason::PermissionDenied) => Err(AuthorizationError::PermissionDenied {
                user_id: principal.user_id,
                required: required.into(),
            }),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow(AllowReason::SuperAdmin) => f.write_str("allow (super_admin)"),
            Decision::Allow(AllowReason::ModuleGrant { module }) => write!(f, "allow (module {})", module),
            Decision::Allow(AllowReason::RolePermission) => f.write_str("allow (role permission)"),
            Decision::Allow(AllowReason::LevelMatched(level)) => write!(f, "allow (level {})", level),
            Decision::Deny(DenyReason::PrincipalUnresolved { reason }) => {
                write!(f, "deny (principal unresolved: {})", reason)
            }
            Decision::Deny(DenyReason::PermissionDenied) => f.write_str("deny (permission denied)"),
        }
    }
}
