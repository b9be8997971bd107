use std::collections::BTreeSet;
use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::AuthorizationError;
use crate::stores::EntityGraph;
use crate::types::internal::graph::PermissionRecord;
use crate::types::internal::{AllowReason, Decision, DenyReason, Level, Principal};

/// Outcome of resolving a principal's current level from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelResolution {
    Resolved(Level),
    Unresolved(String),
}

/// Authorization decision engine
///
/// Every decision re-reads the store; nothing is cached between calls.
/// Transient store failures are returned as errors and never read as allow.
pub struct AuthorizationProvider {
    graph: Arc<dyn EntityGraph>,
}

impl AuthorizationProvider {
    pub fn new(graph: Arc<dyn EntityGraph>) -> Self {
        Self { graph }
    }

    /// Current level of the principal's user
    ///
    /// Missing, soft-deleted or malformed-level users are `Unresolved`.
    pub async fn resolve_level(&self, principal: &Principal) -> Result<LevelResolution, InternalError> {
        let user = match self.graph.get_user(principal.user_id).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => {
                return Ok(LevelResolution::Unresolved(format!(
                    "user {} does not exist",
                    principal.user_id
                )));
            }
            Err(e) => return Err(e),
        };

        match user.level() {
            Ok(level) => {
                if level != principal.claimed_level {
                    tracing::debug!(
                        principal = %principal,
                        claimed = %principal.claimed_level,
                        stored = %level,
                        "token level is stale; using stored level"
                    );
                }
                Ok(LevelResolution::Resolved(level))
            }
            Err(e) => Ok(LevelResolution::Unresolved(format!(
                "user {} has {}",
                principal.user_id, e
            ))),
        }
    }

    /// Decide whether `principal` may act under permission `code`
    ///
    /// super_admin allows outright. An admin is allowed for any code inside a
    /// module it holds at least one permission in. Otherwise the code must be
    /// in the effective permission set.
    pub async fn authorize(&self, principal: &Principal, code: &str) -> Result<Decision, InternalError> {
        let level = match self.resolve_level(principal).await? {
            LevelResolution::Resolved(level) => level,
            LevelResolution::Unresolved(reason) => {
                tracing::info!(principal = %principal, code, reason = %reason, "authorization denied: principal unresolved");
                return Ok(Decision::unresolved(reason));
            }
        };

        if level == Level::SuperAdmin {
            return Ok(Decision::Allow(AllowReason::SuperAdmin));
        }

        let effective = self.graph.permissions_of_user(principal.user_id).await?;

        if level == Level::Admin {
            if let Some(module) = granted_module_for(&effective, code) {
                return Ok(Decision::Allow(AllowReason::ModuleGrant { module }));
            }
        }

        if effective.iter().any(|p| p.code == code) {
            return Ok(Decision::Allow(AllowReason::RolePermission));
        }

        tracing::info!(principal = %principal, level = %level, code, "authorization denied");
        Ok(Decision::Deny(DenyReason::PermissionDenied))
    }

    /// Decide by level alone; an empty `levels` denies everyone
    pub async fn authorize_level(&self, principal: &Principal, levels: &[Level]) -> Result<Decision, InternalError> {
        match self.resolve_level(principal).await? {
            LevelResolution::Unresolved(reason) => {
                tracing::info!(principal = %principal, reason = %reason, "level check denied: principal unresolved");
                Ok(Decision::unresolved(reason))
            }
            LevelResolution::Resolved(level) if levels.contains(&level) => {
                Ok(Decision::Allow(AllowReason::LevelMatched(level)))
            }
            LevelResolution::Resolved(level) => {
                tracing::info!(principal = %principal, level = %level, "level check denied");
                Ok(Decision::Deny(DenyReason::PermissionDenied))
            }
        }
    }

    /// `authorize` as a `Result`; deny becomes an `AuthorizationError`
    pub async fn require(&self, principal: &Principal, code: &str) -> Result<(), InternalError> {
        let decision = self.authorize(principal, code).await?;
        Ok(decision.into_result(principal, code)?)
    }

    /// Resolved level when it is one of `levels`, else an `AuthorizationError`
    pub async fn require_level(&self, principal: &Principal, levels: &[Level]) -> Result<Level, InternalError> {
        let level = self.require_resolved(principal).await?;
        if levels.contains(&level) {
            return Ok(level);
        }

        tracing::info!(principal = %principal, level = %level, "level check denied");
        Err(AuthorizationError::permission_denied(principal.user_id, describe(levels)).into())
    }

    /// Resolved level of any live principal, or `PrincipalUnresolved`
    pub async fn require_resolved(&self, principal: &Principal) -> Result<Level, InternalError> {
        match self.resolve_level(principal).await? {
            LevelResolution::Resolved(level) => Ok(level),
            LevelResolution::Unresolved(reason) => Err(AuthorizationError::principal_unresolved(reason).into()),
        }
    }

    /// Codes in the principal's effective permission set, sorted
    pub async fn effective_codes(&self, principal: &Principal) -> Result<Vec<String>, InternalError> {
        self.require_resolved(principal).await?;
        let effective = self.graph.permissions_of_user(principal.user_id).await?;
        Ok(effective.into_iter().map(|p| p.code).collect())
    }
}

/// First granted module whose prefix covers `code`
fn granted_module_for(effective: &[PermissionRecord], code: &str) -> Option<String> {
    let modules: BTreeSet<&str> = effective.iter().map(|p| p.module_name.as_str()).collect();
    modules
        .into_iter()
        .find(|module| code.strip_prefix(module).is_some_and(|rest| rest.starts_with('.')))
        .map(str::to_string)
}

fn describe(levels: &[Level]) -> String {
    let names: Vec<&str> = levels.iter().map(Level::as_str).collect();
    format!("level in [{}]", names.join(", "))
}
