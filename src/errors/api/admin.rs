use crate::errors::internal::{
    AssignmentError, AuthorizationError, CredentialError, EntityError, InternalError,
};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for admin endpoints
#[derive(Object, Debug)]
pub struct AdminErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Admin operation error types
#[derive(ApiResponse, Debug)]
pub enum AdminError {
    /// Caller could not be resolved to a live principal
    #[oai(status = 401)]
    Unauthorized(Json<AdminErrorResponse>),

    /// Caller is not authorized for the operation
    #[oai(status = 403)]
    PermissionDenied(Json<AdminErrorResponse>),

    /// Mutation would lock the bootstrap super_admin out
    #[oai(status = 403)]
    SelfLockoutRejected(Json<AdminErrorResponse>),

    /// System role may only be changed by a super_admin
    #[oai(status = 403)]
    SystemRoleProtected(Json<AdminErrorResponse>),

    /// Referenced user, role or permission not found
    #[oai(status = 404)]
    NotFound(Json<AdminErrorResponse>),

    /// Unique key already taken or entity still referenced
    #[oai(status = 409)]
    Conflict(Json<AdminErrorResponse>),

    /// Request carried an invalid value
    #[oai(status = 400)]
    InvalidInput(Json<AdminErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AdminErrorResponse>),
}

fn body(error: &str, message: String, status_code: u16) -> Json<AdminErrorResponse> {
    Json(AdminErrorResponse {
        error: error.to_string(),
        message,
        status_code,
    })
}

impl AdminError {
    pub fn unauthorized(message: String) -> Self {
        AdminError::Unauthorized(body("unauthorized", message, 401))
    }

    pub fn permission_denied(message: String) -> Self {
        AdminError::PermissionDenied(body("permission_denied", message, 403))
    }

    pub fn self_lockout_rejected(message: String) -> Self {
        AdminError::SelfLockoutRejected(body("self_lockout_rejected", message, 403))
    }

    pub fn system_role_protected(message: String) -> Self {
        AdminError::SystemRoleProtected(body("system_role_protected", message, 403))
    }

    pub fn not_found(message: String) -> Self {
        AdminError::NotFound(body("not_found", message, 404))
    }

    pub fn conflict(error: &str, message: String) -> Self {
        AdminError::Conflict(body(error, message, 409))
    }

    pub fn invalid_input(error: &str, message: String) -> Self {
        AdminError::InvalidInput(body(error, message, 400))
    }

    /// Convert InternalError to AdminError
    ///
    /// Infrastructure error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Database(db) => {
                tracing::error!("Database error in admin operation: {}", db);
                Self::internal_server_error()
            }
            InternalError::Parse { value_type, .. } => {
                tracing::error!("Parse error for {}: {}", value_type, err);
                Self::internal_server_error()
            }
            InternalError::Crypto { operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }

            InternalError::Authorization(AuthorizationError::PrincipalUnresolved { reason }) => {
                tracing::debug!("Unresolved principal: {}", reason);
                Self::unauthorized("Authentication required".to_string())
            }
            InternalError::Authorization(AuthorizationError::PermissionDenied { .. }) => {
                Self::permission_denied(err.to_string())
            }

            InternalError::Entity(entity) => match entity {
                EntityError::EntityNotFound { .. } => Self::not_found(entity.to_string()),
                EntityError::DuplicateCode { .. } => {
                    Self::conflict("duplicate_code", entity.to_string())
                }
                EntityError::DuplicateUsername { .. } => {
                    Self::conflict("duplicate_username", entity.to_string())
                }
                EntityError::DuplicateEmail { .. } => {
                    Self::conflict("duplicate_email", entity.to_string())
                }
                EntityError::DuplicateRoleName { .. } => {
                    Self::conflict("duplicate_role_name", entity.to_string())
                }
                EntityError::AlreadyBootstrapped { .. } => {
                    Self::conflict("already_bootstrapped", entity.to_string())
                }
                EntityError::CodeInUse { .. } => Self::conflict("code_in_use", entity.to_string()),
                EntityError::InvalidPermissionCode { .. } => {
                    Self::invalid_input("invalid_permission_code", entity.to_string())
                }
                EntityError::InvalidField { .. } => {
                    Self::invalid_input("invalid_field", entity.to_string())
                }
                EntityError::SystemRoleProtected { .. } => {
                    Self::system_role_protected(entity.to_string())
                }
            },

            InternalError::Assignment(AssignmentError::InvalidLevelValue { .. }) => {
                Self::invalid_input("invalid_level_value", err.to_string())
            }
            InternalError::Assignment(AssignmentError::SelfLockoutRejected { .. }) => {
                tracing::warn!("Rejected lockout attempt: {}", err);
                Self::self_lockout_rejected(err.to_string())
            }

            InternalError::Credential(CredentialError::PasswordHashingFailed(_)) => {
                tracing::error!("Credential error in admin operation: {}", err);
                Self::internal_server_error()
            }
            InternalError::Credential(_) => {
                Self::unauthorized("Authentication required".to_string())
            }
        }
    }

    /// Create a generic internal server error
    fn internal_server_error() -> Self {
        AdminError::InternalError(body(
            "internal_error",
            "An internal error occurred".to_string(),
            500,
        ))
    }

    fn response(&self) -> &AdminErrorResponse {
        match self {
            AdminError::Unauthorized(json)
            | AdminError::PermissionDenied(json)
            | AdminError::SelfLockoutRejected(json)
            | AdminError::SystemRoleProtected(json)
            | AdminError::NotFound(json)
            | AdminError::Conflict(json)
            | AdminError::InvalidInput(json)
            | AdminError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    /// Get the error code identifier from the error variant
    pub fn error_code(&self) -> &str {
        &self.response().error
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }
}

impl From<InternalError> for AdminError {
    fn from(err: InternalError) -> Self {
        AdminError::from_internal_error(err)
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
