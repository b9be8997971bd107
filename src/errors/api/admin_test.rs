#[cfg(test)]
mod tests {
    use crate::errors::AdminError;
    use crate::errors::internal::{
        AssignmentError, AuthorizationError, EntityError, EntityKind, InternalError,
    };
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_converts_to_internal_server_error() {
        let db_err = DbErr::RecordNotFound("test".to_string());
        let admin_err = AdminError::from(InternalError::database("get_user", db_err));

        assert_eq!(admin_err.status_code(), 500);
        assert_eq!(admin_err.message(), "An internal error occurred");
    }

    #[test]
    fn test_crypto_error_hides_details() {
        let admin_err = AdminError::from(InternalError::crypto("password_hash", "bad pepper"));

        assert_eq!(admin_err.status_code(), 500);
        assert!(!admin_err.message().contains("pepper"));
    }

    #[test]
    fn test_unresolved_principal_is_401() {
        let err = InternalError::from(AuthorizationError::principal_unresolved("user deleted"));
        let admin_err = AdminError::from(err);

        assert_eq!(admin_err.status_code(), 401);
        assert_eq!(admin_err.error_code(), "unauthorized");
    }

    #[test]
    fn test_permission_denied_is_403() {
        let err = InternalError::from(AuthorizationError::permission_denied(7, "hr.employees.delete"));
        let admin_err = AdminError::from(err);

        assert_eq!(admin_err.status_code(), 403);
        assert!(admin_err.message().contains("hr.employees.delete"));
    }

    #[test]
    fn test_self_lockout_is_403() {
        let err = InternalError::from(AssignmentError::SelfLockoutRejected {
            user_id: 1,
            attempted: "downgraded to admin".to_string(),
        });
        let admin_err = AdminError::from(err);

        assert_eq!(admin_err.status_code(), 403);
        assert_eq!(admin_err.error_code(), "self_lockout_rejected");
    }

    #[test]
    fn test_not_found_is_404() {
        let admin_err = AdminError::from(InternalError::not_found(EntityKind::Role, 42));

        assert_eq!(admin_err.status_code(), 404);
        assert_eq!(admin_err.message(), "role not found: 42");
    }

    #[test]
    fn test_duplicates_and_code_in_use_are_409() {
        let dup = AdminError::from(InternalError::from(EntityError::DuplicateCode {
            code: "hr.employees.view".to_string(),
        }));
        assert_eq!(dup.status_code(), 409);
        assert_eq!(dup.error_code(), "duplicate_code");

        let in_use = AdminError::from(InternalError::from(EntityError::CodeInUse {
            code: "hr.employees.view".to_string(),
            references: 2,
        }));
        assert_eq!(in_use.status_code(), 409);
        assert_eq!(in_use.error_code(), "code_in_use");
    }

    #[test]
    fn test_invalid_level_is_400() {
        let err = InternalError::from(AssignmentError::InvalidLevelValue {
            value: "superuser".to_string(),
        });
        let admin_err = AdminError::from(err);

        assert_eq!(admin_err.status_code(), 400);
        assert!(admin_err.message().contains("superuser"));
    }

    #[test]
    fn test_system_role_protected_is_403() {
        let admin_err = AdminError::from(InternalError::from(EntityError::SystemRoleProtected {
            name: "auditor".to_string(),
        }));

        assert_eq!(admin_err.status_code(), 403);
    }
}
