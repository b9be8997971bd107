use poem::Request;

use crate::api::BearerAuth;
use crate::errors::InternalError;
use crate::providers::TokenProvider;
use crate::types::internal::context::RequestContext;

/// Validate the bearer token and build the request context
pub fn authenticate(
    req: &Request,
    auth: &BearerAuth,
    token_provider: &TokenProvider,
) -> Result<RequestContext, InternalError> {
    RequestContext::authenticate(req, &auth.0.token, token_provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::CredentialError;
    use crate::test::utils::test_secret_manager;
    use crate::types::internal::Level;
    use poem_openapi::auth::Bearer;

    #[test]
    fn test_authenticate_attaches_claims() {
        let provider = TokenProvider::new(test_secret_manager());
        let issued = provider.generate_jwt(4, "hana", Level::Admin).unwrap();
        let req = Request::builder().finish();

        let ctx = authenticate(&req, &BearerAuth(Bearer { token: issued.token }), &provider).unwrap();

        assert!(ctx.is_authenticated());
        assert_eq!(ctx.actor_id, "4");
        assert_eq!(ctx.principal().unwrap().claimed_level, Level::Admin);
    }

    #[test]
    fn test_authenticate_rejects_garbage_token() {
        let provider = TokenProvider::new(test_secret_manager());
        let req = Request::builder().finish();

        let result = authenticate(
            &req,
            &BearerAuth(Bearer {
                token: "not.a.jwt".to_string(),
            }),
            &provider,
        );
        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::InvalidToken { .. }))
        ));
    }
}
