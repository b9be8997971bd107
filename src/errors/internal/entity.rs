use std::fmt;

use thiserror::Error;

/// Which node of the entity graph an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Role,
    Permission,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::User => f.write_str("user"),
            EntityKind::Role => f.write_str("role"),
            EntityKind::Permission => f.write_str("permission"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// Referenced entity is absent or soft-deleted
    #[error("{kind} not found: {key}")]
    EntityNotFound { kind: EntityKind, key: String },

    #[error("Permission code already exists: {code}")]
    DuplicateCode { code: String },

    #[error("Username already exists: {username}")]
    DuplicateUsername { username: String },

    #[error("Email already exists: {email}")]
    DuplicateEmail { email: String },

    #[error("Role name already exists: {name}")]
    DuplicateRoleName { name: String },

    #[error("Invalid permission code '{code}': {reason}")]
    InvalidPermissionCode { code: String, reason: String },

    /// Code segments cannot change once a role references the permission
    #[error("Permission code {code} is referenced by {references} role(s) and cannot change")]
    CodeInUse { code: String, references: u64 },

    #[error("System role {name} can only be changed by a super_admin")]
    SystemRoleProtected { name: String },

    /// First-account seeding refused because accounts exist
    #[error("Already bootstrapped: {existing_users} user(s) exist")]
    AlreadyBootstrapped { existing_users: u64 },

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

impl EntityError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
