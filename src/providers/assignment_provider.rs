use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::{AssignmentError, AuthorizationError};
use crate::stores::EntityGraph;
use crate::types::internal::graph::UserRecord;
use crate::types::internal::{Level, MembershipChange, PermissionId, Principal, RoleId, UserId};

/// Mutations of the role graph and of user levels
///
/// The four membership operations validate existence only; callers decide
/// who may invoke them. Each is idempotent and reports whether it changed
/// anything.
pub struct AssignmentProvider {
    graph: Arc<dyn EntityGraph>,
}

impl AssignmentProvider {
    pub fn new(graph: Arc<dyn EntityGraph>) -> Self {
        Self { graph }
    }

    pub async fn assign_role(&self, user_id: UserId, role_id: RoleId) -> Result<MembershipChange, InternalError> {
        self.graph.get_user(user_id).await?;
        self.graph.get_role(role_id).await?;

        let change = self.graph.add_user_role(user_id, role_id).await?;
        tracing::info!(user_id, role_id, ?change, "role assigned");
        Ok(change)
    }

    pub async fn revoke_role(&self, user_id: UserId, role_id: RoleId) -> Result<MembershipChange, InternalError> {
        self.graph.get_user(user_id).await?;
        self.graph.get_role(role_id).await?;

        let change = self.graph.remove_user_role(user_id, role_id).await?;
        tracing::info!(user_id, role_id, ?change, "role revoked");
        Ok(change)
    }

    pub async fn assign_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<MembershipChange, InternalError> {
        self.graph.get_role(role_id).await?;
        self.graph.get_permission(permission_id).await?;

        let change = self.graph.add_role_permission(role_id, permission_id).await?;
        tracing::info!(role_id, permission_id, ?change, "permission granted to role");
        Ok(change)
    }

    pub async fn revoke_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<MembershipChange, InternalError> {
        self.graph.get_role(role_id).await?;
        self.graph.get_permission(permission_id).await?;

        let change = self.graph.remove_role_permission(role_id, permission_id).await?;
        tracing::info!(role_id, permission_id, ?change, "permission revoked from role");
        Ok(change)
    }

    /// Change a user's level
    ///
    /// `caller_level` must come from the decision engine, not from the token.
    /// Rejections, in order:
    /// - caller below admin: `PermissionDenied`
    /// - `requested` not a level name: `InvalidLevelValue`
    /// - target is the bootstrap identity and `requested` is not super_admin: `SelfLockoutRejected`
    /// - `requested` ranks above the caller: `PermissionDenied`
    /// - the target currently ranks above the caller: `PermissionDenied`
    pub async fn set_user_level(
        &self,
        caller: &Principal,
        caller_level: Level,
        target_id: UserId,
        requested: &str,
    ) -> Result<UserRecord, InternalError> {
        if !caller_level.is_admin_or_above() {
            return Err(AuthorizationError::permission_denied(caller.user_id, "level in [admin, super_admin]").into());
        }

        let requested_level: Level = requested.parse().map_err(|_| AssignmentError::InvalidLevelValue {
            value: requested.to_string(),
        })?;

        let target = self.graph.get_user(target_id).await?;

        if target.is_bootstrap() && requested_level != Level::SuperAdmin {
            tracing::warn!(caller = %caller, target_id, requested = %requested_level, "bootstrap downgrade rejected");
            return Err(AssignmentError::SelfLockoutRejected {
                user_id: target_id,
                attempted: format!("downgraded to {}", requested_level),
            }
            .into());
        }

        if requested_level > caller_level {
            return Err(AuthorizationError::permission_denied(
                caller.user_id,
                format!("{} may not grant {}", caller_level, requested_level),
            )
            .into());
        }

        // An unreadable stored level is treated as the highest rank
        let current_level = target.level().unwrap_or(Level::SuperAdmin);
        if current_level > caller_level {
            return Err(AuthorizationError::permission_denied(
                caller.user_id,
                format!("{} may not modify a {}", caller_level, current_level),
            )
            .into());
        }

        if target.level == requested_level.as_str() {
            return Ok(target);
        }

        let updated = self.graph.set_user_level(target_id, requested_level).await?;
        tracing::info!(
            caller = %caller,
            target_id,
            from = %target.level,
            to = %requested_level,
            "user level changed"
        );
        Ok(updated)
    }
}
