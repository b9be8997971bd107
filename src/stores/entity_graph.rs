use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::errors::InternalError;
use crate::errors::internal::EntityError;
use crate::stores::{MembershipStore, PermissionStore, RoleStore, UserStore};
use crate::types::internal::graph::{
    NewPermission, NewRole, NewUser, PermissionRecord, PermissionUpdate, RoleRecord, RoleUpdate,
    UserForAuth, UserRecord, UserUpdate,
};
use crate::types::internal::{Level, MembershipChange, PermissionId, RoleId, UserId};

/// Users, roles, permissions and the two join relations between them.
///
/// Natural-key lookups are exact, case-sensitive matches and return `Ok(None)`
/// when absent. Id lookups of missing or soft-deleted rows return
/// `EntityError::EntityNotFound`. Store failures surface as
/// `InternalError::Database`.
#[async_trait]
pub trait EntityGraph: Send + Sync {
    // Users
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, InternalError>;
    async fn get_user(&self, id: UserId) -> Result<UserRecord, InternalError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>, InternalError>;
    async fn list_users(&self) -> Result<Vec<UserRecord>, InternalError>;
    async fn count_users(&self) -> Result<u64, InternalError>;
    async fn update_user(&self, id: UserId, changes: UserUpdate) -> Result<UserRecord, InternalError>;
    async fn set_user_level(&self, id: UserId, level: Level) -> Result<UserRecord, InternalError>;
    async fn delete_user(&self, id: UserId) -> Result<(), InternalError>;
    async fn credentials_for_username(&self, username: &str) -> Result<Option<UserForAuth>, InternalError>;
    async fn touch_last_login(&self, id: UserId) -> Result<(), InternalError>;

    // Roles
    async fn create_role(&self, new_role: NewRole) -> Result<RoleRecord, InternalError>;
    async fn get_role(&self, id: RoleId) -> Result<RoleRecord, InternalError>;
    async fn find_role_by_name(&self, name: &str) -> Result<Option<RoleRecord>, InternalError>;
    async fn list_roles(&self) -> Result<Vec<RoleRecord>, InternalError>;
    async fn update_role(&self, id: RoleId, changes: RoleUpdate) -> Result<RoleRecord, InternalError>;
    async fn delete_role(&self, id: RoleId) -> Result<(), InternalError>;

    // Permissions
    async fn create_permission(&self, new_permission: NewPermission) -> Result<PermissionRecord, InternalError>;
    async fn get_permission(&self, id: PermissionId) -> Result<PermissionRecord, InternalError>;
    async fn find_permission_by_code(&self, code: &str) -> Result<Option<PermissionRecord>, InternalError>;
    async fn list_permissions(&self) -> Result<Vec<PermissionRecord>, InternalError>;
    /// Fails with `CodeInUse` when a code segment changes on a referenced permission
    async fn update_permission(
        &self,
        id: PermissionId,
        changes: PermissionUpdate,
    ) -> Result<PermissionRecord, InternalError>;
    async fn delete_permission(&self, id: PermissionId) -> Result<(), InternalError>;

    // Join relations
    async fn add_user_role(&self, user_id: UserId, role_id: RoleId) -> Result<MembershipChange, InternalError>;
    async fn remove_user_role(&self, user_id: UserId, role_id: RoleId) -> Result<MembershipChange, InternalError>;
    async fn has_user_role(&self, user_id: UserId, role_id: RoleId) -> Result<bool, InternalError>;
    async fn add_role_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<MembershipChange, InternalError>;
    async fn remove_role_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<MembershipChange, InternalError>;
    async fn has_role_permission(&self, role_id: RoleId, permission_id: PermissionId) -> Result<bool, InternalError>;

    // Traversals
    async fn roles_of_user(&self, user_id: UserId) -> Result<Vec<RoleRecord>, InternalError>;
    async fn users_of_role(&self, role_id: RoleId) -> Result<Vec<UserRecord>, InternalError>;
    async fn permissions_of_role(&self, role_id: RoleId) -> Result<Vec<PermissionRecord>, InternalError>;
    async fn roles_of_permission(&self, permission_id: PermissionId) -> Result<Vec<RoleRecord>, InternalError>;
    /// Effective permission set: union over active roles, active permissions only
    async fn permissions_of_user(&self, user_id: UserId) -> Result<Vec<PermissionRecord>, InternalError>;
}

/// SQL-backed entity graph over a single connection pool
pub struct DatabaseEntityGraph {
    db: DatabaseConnection,
    users: UserStore,
    roles: RoleStore,
    permissions: PermissionStore,
    memberships: MembershipStore,
}

impl DatabaseEntityGraph {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            users: UserStore::new(),
            roles: RoleStore::new(),
            permissions: PermissionStore::new(),
            memberships: MembershipStore::new(),
        }
    }
}

#[async_trait]
impl EntityGraph for DatabaseEntityGraph {
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, InternalError> {
        let created = self.users.insert(&self.db, new_user).await?;
        tracing::info!(user_id = created.id, username = %created.username, level = %created.level, "user created");
        Ok(created)
    }

    async fn get_user(&self, id: UserId) -> Result<UserRecord, InternalError> {
        self.users.get(&self.db, id).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRecord>, InternalError> {
        self.users.find_by_username(&self.db, username).await
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, InternalError> {
        self.users.list(&self.db).await
    }

    async fn count_users(&self) -> Result<u64, InternalError> {
        self.users.count_all(&self.db).await
    }

    async fn update_user(&self, id: UserId, changes: UserUpdate) -> Result<UserRecord, InternalError> {
        let updated = self.users.update(&self.db, id, changes).await?;
        tracing::info!(user_id = id, "user updated");
        Ok(updated)
    }

    async fn set_user_level(&self, id: UserId, level: Level) -> Result<UserRecord, InternalError> {
        let updated = self.users.set_level(&self.db, id, level).await?;
        tracing::info!(user_id = id, level = %level, "user level stored");
        Ok(updated)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), InternalError> {
        self.users.soft_delete(&self.db, id).await?;
        tracing::info!(user_id = id, "user soft-deleted");
        Ok(())
    }

    async fn credentials_for_username(&self, username: &str) -> Result<Option<UserForAuth>, InternalError> {
        self.users.credentials_for_username(&self.db, username).await
    }

    async fn touch_last_login(&self, id: UserId) -> Result<(), InternalError> {
        self.users.touch_last_login(&self.db, id).await
    }

    async fn create_role(&self, new_role: NewRole) -> Result<RoleRecord, InternalError> {
        let created = self.roles.insert(&self.db, new_role).await?;
        tracing::info!(role_id = created.id, name = %created.name, "role created");
        Ok(created)
    }

    async fn get_role(&self, id: RoleId) -> Result<RoleRecord, InternalError> {
        self.roles.get(&self.db, id).await
    }

    async fn find_role_by_name(&self, name: &str) -> Result<Option<RoleRecord>, InternalError> {
        self.roles.find_by_name(&self.db, name).await
    }

    async fn list_roles(&self) -> Result<Vec<RoleRecord>, InternalError> {
        self.roles.list(&self.db).await
    }

    async fn update_role(&self, id: RoleId, changes: RoleUpdate) -> Result<RoleRecord, InternalError> {
        let updated = self.roles.update(&self.db, id, changes).await?;
        tracing::info!(role_id = id, "role updated");
        Ok(updated)
    }

    async fn delete_role(&self, id: RoleId) -> Result<(), InternalError> {
        self.roles.soft_delete(&self.db, id).await?;
        tracing::info!(role_id = id, "role soft-deleted");
        Ok(())
    }

    async fn create_permission(&self, new_permission: NewPermission) -> Result<PermissionRecord, InternalError> {
        let created = self.permissions.insert(&self.db, new_permission).await?;
        tracing::info!(permission_id = created.id, code = %created.code, "permission created");
        Ok(created)
    }

    async fn get_permission(&self, id: PermissionId) -> Result<PermissionRecord, InternalError> {
        self.permissions.get(&self.db, id).await
    }

    async fn find_permission_by_code(&self, code: &str) -> Result<Option<PermissionRecord>, InternalError> {
        self.permissions.find_by_code(&self.db, code).await
    }

    async fn list_permissions(&self) -> Result<Vec<PermissionRecord>, InternalError> {
        self.permissions.list(&self.db).await
    }

    async fn update_permission(
        &self,
        id: PermissionId,
        changes: PermissionUpdate,
    ) -> Result<PermissionRecord, InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::transaction("begin_update_permission", e))?;

        let current = self.permissions.get(&txn, id).await?;
        let code_changes = changes.module_name.as_ref().is_some_and(|m| *m != current.module_name)
            || changes.resource.as_ref().is_some_and(|r| *r != current.resource)
            || changes.action.as_ref().is_some_and(|a| *a != current.action);

        if code_changes {
            let references = self.permissions.count_role_references(&txn, id).await?;
            if references > 0 {
                return Err(EntityError::CodeInUse {
                    code: current.code,
                    references,
                }
                .into());
            }
        }

        let updated = self.permissions.update(&txn, current, changes).await?;

        txn.commit()
            .await
            .map_err(|e| InternalError::transaction("commit_update_permission", e))?;

        tracing::info!(permission_id = id, code = %updated.code, "permission updated");
        Ok(updated)
    }

    async fn delete_permission(&self, id: PermissionId) -> Result<(), InternalError> {
        self.permissions.soft_delete(&self.db, id).await?;
        tracing::info!(permission_id = id, "permission soft-deleted");
        Ok(())
    }

    async fn add_user_role(&self, user_id: UserId, role_id: RoleId) -> Result<MembershipChange, InternalError> {
        self.memberships.add_user_role(&self.db, user_id, role_id).await
    }

    async fn remove_user_role(&self, user_id: UserId, role_id: RoleId) -> Result<MembershipChange, InternalError> {
        self.memberships.remove_user_role(&self.db, user_id, role_id).await
    }

    async fn has_user_role(&self, user_id: UserId, role_id: RoleId) -> Result<bool, InternalError> {
        self.memberships.has_user_role(&self.db, user_id, role_id).await
    }

    async fn add_role_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<MembershipChange, InternalError> {
        self.memberships.add_role_permission(&self.db, role_id, permission_id).await
    }

    async fn remove_role_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<MembershipChange, InternalError> {
        self.memberships.remove_role_permission(&self.db, role_id, permission_id).await
    }

    async fn has_role_permission(&self, role_id: RoleId, permission_id: PermissionId) -> Result<bool, InternalError> {
        self.memberships.has_role_permission(&self.db, role_id, permission_id).await
    }

    async fn roles_of_user(&self, user_id: UserId) -> Result<Vec<RoleRecord>, InternalError> {
        self.memberships.roles_of_user(&self.db, user_id).await
    }

    async fn users_of_role(&self, role_id: RoleId) -> Result<Vec<UserRecord>, InternalError> {
        self.memberships.users_of_role(&self.db, role_id).await
    }

    async fn permissions_of_role(&self, role_id: RoleId) -> Result<Vec<PermissionRecord>, InternalError> {
        self.memberships.permissions_of_role(&self.db, role_id).await
    }

    async fn roles_of_permission(&self, permission_id: PermissionId) -> Result<Vec<RoleRecord>, InternalError> {
        self.memberships.roles_of_permission(&self.db, permission_id).await
    }

    async fn permissions_of_user(&self, user_id: UserId) -> Result<Vec<PermissionRecord>, InternalError> {
        tracing::debug!(user_id, "resolving effective permissions");
        self.memberships.permissions_of_user(&self.db, user_id).await
    }
}
