#[cfg(test)]
mod tests {
    use crate::errors::AuthError;
    use crate::errors::internal::{AuthorizationError, CredentialError, InternalError};
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_converts_to_internal_server_error() {
        let db_err = DbErr::RecordNotFound("test".to_string());
        let auth_err = AuthError::from(InternalError::database("get_user", db_err));

        assert_eq!(auth_err.message(), "An internal error occurred");
    }

    #[test]
    fn test_invalid_credentials_converts_correctly() {
        let auth_err = AuthError::from(InternalError::from(CredentialError::InvalidCredentials));

        assert!(matches!(auth_err, AuthError::InvalidCredentials(_)));
        assert_eq!(auth_err.message(), "Invalid username or password");
    }

    #[test]
    fn test_invalid_token_converts_correctly() {
        let err = InternalError::from(CredentialError::invalid_token("jwt", "bad signature"));
        let auth_err = AuthError::from(err);

        assert!(matches!(auth_err, AuthError::InvalidToken(_)));
        assert!(!auth_err.message().contains("signature"));
    }

    #[test]
    fn test_expired_token_converts_correctly() {
        let err = InternalError::from(CredentialError::ExpiredToken("jwt".to_string()));

        assert!(matches!(AuthError::from(err), AuthError::ExpiredToken(_)));
    }

    #[test]
    fn test_unresolved_principal_converts_to_unauthorized() {
        let err = InternalError::from(AuthorizationError::principal_unresolved("missing level claim"));

        assert!(matches!(AuthError::from(err), AuthError::Unauthorized(_)));
    }
}
