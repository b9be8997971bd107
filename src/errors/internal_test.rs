#[cfg(test)]
mod tests {
    use crate::errors::internal::{
        AssignmentError, AuthorizationError, CredentialError, EntityError, EntityKind,
        InternalError,
    };
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_includes_operation() {
        let db_err = DbErr::RecordNotFound("test record".to_string());
        let error = InternalError::database("create_user", db_err);

        let error_string = error.to_string();
        assert!(error_string.contains("create_user"));
        assert!(error_string.contains("Database error"));
    }

    #[test]
    fn test_transaction_error_includes_operation() {
        let db_err = DbErr::RecordNotFound("test".to_string());
        let error = InternalError::transaction("set_user_level", db_err);

        let error_string = error.to_string();
        assert!(error_string.contains("set_user_level"));
        assert!(error_string.contains("Transaction error"));
    }

    #[test]
    fn test_parse_error_includes_value_type() {
        let error = InternalError::parse("level", "unknown level 'root'");

        let error_string = error.to_string();
        assert!(error_string.contains("level"));
        assert!(error_string.contains("root"));
        assert!(error_string.contains("Parse error"));
    }

    #[test]
    fn test_crypto_error_includes_operation() {
        let error = InternalError::crypto("argon2_init", "invalid secret length");

        let error_string = error.to_string();
        assert!(error_string.contains("argon2_init"));
        assert!(error_string.contains("invalid secret length"));
    }

    #[test]
    fn test_domain_errors_convert_via_from() {
        let error: InternalError = AuthorizationError::permission_denied(3, "finance.budget.manage").into();
        assert!(matches!(error, InternalError::Authorization(_)));

        let error: InternalError = AssignmentError::InvalidLevelValue {
            value: "superuser".to_string(),
        }
        .into();
        assert!(matches!(error, InternalError::Assignment(_)));

        let error: InternalError = CredentialError::InvalidCredentials.into();
        assert!(matches!(error, InternalError::Credential(_)));
    }

    #[test]
    fn test_not_found_helper() {
        let error = InternalError::not_found(EntityKind::Permission, "hr.employees.view");

        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "permission not found: hr.employees.view");
        assert!(!InternalError::parse("x", "y").is_not_found());
    }

    #[test]
    fn test_code_in_use_mentions_reference_count() {
        let error = EntityError::CodeInUse {
            code: "hr.employees.edit".to_string(),
            references: 3,
        };

        assert!(error.to_string().contains("3 role(s)"));
    }
}
