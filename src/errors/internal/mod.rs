use thiserror::Error;

pub mod assignment;
pub mod authorization;
pub mod credential;
pub mod database;
pub mod entity;

pub use assignment::AssignmentError;
pub use authorization::AuthorizationError;
pub use credential::CredentialError;
pub use database::DatabaseError;
pub use entity::{EntityError, EntityKind};

/// Internal error type for store, provider and coordinator operations
///
/// Infrastructure errors (database, parse, crypto) are shared; domain errors
/// are grouped per concern. Not exposed via API - endpoints convert to
/// AuthError or AdminError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn transaction(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Transaction {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn not_found(kind: EntityKind, key: impl ToString) -> Self {
        Self::Entity(EntityError::EntityNotFound {
            kind,
            key: key.to_string(),
        })
    }

    /// True for referenced-entity-absent outcomes, as opposed to transient failures
    pub fn is_not_found(&self) -> bool {
        matches!(self, InternalError::Entity(EntityError::EntityNotFound { .. }))
    }
}
