use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::{AssignmentError, AuthorizationError, EntityError};
use crate::providers::CryptoProvider;
use crate::stores::EntityGraph;
use crate::types::internal::graph::{NewUser, UserRecord, UserUpdate};
use crate::types::internal::{Level, Principal, UserId};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Input for creating an account; `level` defaults to `user`
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// User lifecycle rules on top of the entity graph
pub struct UserProvider {
    graph: Arc<dyn EntityGraph>,
    crypto: Arc<CryptoProvider>,
}

impl UserProvider {
    pub fn new(graph: Arc<dyn EntityGraph>, crypto: Arc<CryptoProvider>) -> Self {
        Self { graph, crypto }
    }

    /// Create an account at or below the caller's level
    pub async fn create_user(
        &self,
        caller: &Principal,
        caller_level: Level,
        input: CreateUserInput,
    ) -> Result<UserRecord, InternalError> {
        let level = match input.level.as_deref() {
            None => Level::User,
            Some(raw) => raw.parse().map_err(|_| AssignmentError::InvalidLevelValue {
                value: raw.to_string(),
            })?,
        };

        if level > caller_level {
            return Err(AuthorizationError::permission_denied(
                caller.user_id,
                format!("{} may not create a {}", caller_level, level),
            )
            .into());
        }

        self.insert_user(input.username, input.email, &input.password, level).await
    }

    /// Seed the first account as super_admin; refused once any row exists
    pub async fn bootstrap_super_admin(
        &self,
        username: String,
        email: String,
        password: &str,
    ) -> Result<UserRecord, InternalError> {
        let existing_users = self.graph.count_users().await?;
        if existing_users > 0 {
            return Err(EntityError::AlreadyBootstrapped { existing_users }.into());
        }

        self.insert_user(username, email, password, Level::SuperAdmin).await
    }

    /// Change username, email or password
    ///
    /// Users may edit themselves; editing anyone else takes an admin level at
    /// or above the target's.
    pub async fn update_user(
        &self,
        caller: &Principal,
        caller_level: Level,
        target_id: UserId,
        input: UpdateUserInput,
    ) -> Result<UserRecord, InternalError> {
        let target = self.graph.get_user(target_id).await?;
        if caller.user_id != target_id {
            ensure_may_manage(caller, caller_level, &target)?;
        }

        if let Some(username) = &input.username {
            validate_username(username)?;
        }
        if let Some(email) = &input.email {
            validate_email(email)?;
        }
        let password_hash = match &input.password {
            Some(password) => {
                validate_password(password)?;
                Some(self.crypto.hash_password(password).await?)
            }
            None => None,
        };

        self.graph
            .update_user(
                target_id,
                UserUpdate {
                    username: input.username,
                    email: input.email,
                    password_hash,
                },
            )
            .await
    }

    /// Soft-delete a user
    ///
    /// The bootstrap identity cannot be deleted while it holds an admin level.
    pub async fn delete_user(&self, caller: &Principal, caller_level: Level, target_id: UserId) -> Result<(), InternalError> {
        let target = self.graph.get_user(target_id).await?;

        let target_level = target.level().unwrap_or(Level::SuperAdmin);
        if target.is_bootstrap() && target_level.is_admin_or_above() {
            tracing::warn!(caller = %caller, "bootstrap deletion rejected");
            return Err(AssignmentError::SelfLockoutRejected {
                user_id: target_id,
                attempted: "deleted".to_string(),
            }
            .into());
        }

        ensure_may_manage(caller, caller_level, &target)?;
        self.graph.delete_user(target_id).await
    }

    async fn insert_user(
        &self,
        username: String,
        email: String,
        password: &str,
        level: Level,
    ) -> Result<UserRecord, InternalError> {
        validate_username(&username)?;
        validate_email(&email)?;
        validate_password(password)?;

        let password_hash = self.crypto.hash_password(password).await?;
        self.graph
            .create_user(NewUser {
                username,
                email,
                password_hash,
                level,
            })
            .await
    }
}

fn ensure_may_manage(caller: &Principal, caller_level: Level, target: &UserRecord) -> Result<(), InternalError> {
    let target_level = target.level().unwrap_or(Level::SuperAdmin);
    if !caller_level.is_admin_or_above() || target_level > caller_level {
        return Err(AuthorizationError::permission_denied(
            caller.user_id,
            format!("manage user {} ({})", target.id, target_level),
        )
        .into());
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<(), EntityError> {
    if username.trim().is_empty() || username.len() > 50 {
        return Err(EntityError::invalid_field("username", "must be 1-50 characters"));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(EntityError::invalid_field("username", "must not contain whitespace"));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), EntityError> {
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed || email.len() > 100 {
        return Err(EntityError::invalid_field("email", "must be a valid address"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), EntityError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(EntityError::invalid_field(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}
