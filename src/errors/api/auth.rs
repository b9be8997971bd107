use crate::errors::internal::{AuthorizationError, CredentialError, InternalError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for authentication endpoints
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid username or password
    #[oai(status = 401)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// Invalid or malformed JWT
    #[oai(status = 401)]
    InvalidToken(Json<AuthErrorResponse>),

    /// JWT has expired
    #[oai(status = 401)]
    ExpiredToken(Json<AuthErrorResponse>),

    /// Token is valid but the principal behind it no longer resolves
    #[oai(status = 401)]
    Unauthorized(Json<AuthErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

impl AuthError {
    /// Create an InvalidCredentials error
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(AuthErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid username or password".to_string(),
            status_code: 401,
        }))
    }

    /// Create an InvalidToken error
    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(Json(AuthErrorResponse {
            error: "invalid_token".to_string(),
            message: "Invalid or malformed JWT".to_string(),
            status_code: 401,
        }))
    }

    /// Create an ExpiredToken error
    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(Json(AuthErrorResponse {
            error: "expired_token".to_string(),
            message: "JWT has expired".to_string(),
            status_code: 401,
        }))
    }

    /// Create an Unauthorized error
    pub fn unauthorized() -> Self {
        AuthError::Unauthorized(Json(AuthErrorResponse {
            error: "unauthorized".to_string(),
            message: "Authentication required".to_string(),
            status_code: 401,
        }))
    }

    /// Convert InternalError to AuthError
    ///
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Database(db) => {
                tracing::error!("Database error in auth operation: {}", db);
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

            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::InvalidToken { token_type, reason }) => {
                tracing::debug!("Invalid token: {} - {}", token_type, reason);
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::ExpiredToken(token_type)) => {
                tracing::debug!("Expired token: {}", token_type);
                Self::expired_token()
            }
            InternalError::Authorization(AuthorizationError::PrincipalUnresolved { reason }) => {
                tracing::debug!("Unresolved principal: {}", reason);
                Self::unauthorized()
            }

            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Create a generic internal server error
    fn internal_server_error() -> Self {
        AuthError::InternalError(Json(AuthErrorResponse {
            error: "internal_error".to_string(),
            message: "An internal error occurred".to_string(),
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::Unauthorized(json)
            | AuthError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        AuthError::from_internal_error(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
