use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, SecurityScheme, Tags, auth::Bearer, param::Path, payload::Json};

use crate::api::helpers;
use crate::coordinators::{LoginCoordinator, UserCoordinator};
use crate::errors::AuthError;
use crate::providers::TokenProvider;
use crate::types::dto::auth::{CheckResponse, LoginRequest, PermissionsResponse, TokenResponse, WhoAmIResponse};
use crate::types::internal::Level;
use crate::types::internal::context::RequestContext;

/// Authentication and caller self-inspection endpoints
pub struct AuthApi {
    login_coordinator: Arc<LoginCoordinator>,
    user_coordinator: Arc<UserCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl AuthApi {
    pub fn new(
        login_coordinator: Arc<LoginCoordinator>,
        user_coordinator: Arc<UserCoordinator>,
        token_provider: Arc<TokenProvider>,
    ) -> Self {
        Self {
            login_coordinator,
            user_coordinator,
            token_provider,
        }
    }
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", key_name = "Authorization", key_in = "header", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with username and password to receive an access token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, AuthError> {
        let ctx = RequestContext::for_api(RequestContext::extract_ip_address(req));
        let outcome = self
            .login_coordinator
            .login(&ctx, &body.username, &body.password)
            .await?;

        Ok(Json(TokenResponse {
            access_token: outcome.token.token,
            token_type: "Bearer".to_string(),
            expires_in: outcome.token.expires_in,
            user_id: outcome.user_id,
            username: outcome.username,
            level: outcome.level.to_string(),
        }))
    }

    /// Current user, with the level re-read from storage
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, req: &Request, auth: BearerAuth) -> Result<Json<WhoAmIResponse>, AuthError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let user = self.user_coordinator.whoami(&ctx).await?;
        let expires_at = ctx.claims.as_ref().map(|c| c.exp).unwrap_or_default();

        Ok(Json(WhoAmIResponse {
            user_id: user.id,
            username: user.username,
            level: user.level,
            expires_at,
        }))
    }

    /// Effective permission codes of the caller
    #[oai(path = "/permissions", method = "get", tag = "AuthTags::Authentication")]
    async fn permissions(&self, req: &Request, auth: BearerAuth) -> Result<Json<PermissionsResponse>, AuthError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let (level, codes) = self.user_coordinator.my_permissions(&ctx).await?;

        Ok(Json(PermissionsResponse {
            level: level.to_string(),
            unrestricted: level == Level::SuperAdmin,
            codes,
        }))
    }

    /// Authorization decision for the caller on one permission code
    #[oai(path = "/check/:code", method = "get", tag = "AuthTags::Authentication")]
    async fn check(&self, req: &Request, auth: BearerAuth, code: Path<String>) -> Result<Json<CheckResponse>, AuthError> {
        let ctx = helpers::authenticate(req, &auth, &self.token_provider)?;
        let decision = self.user_coordinator.check(&ctx, &code.0).await?;

        Ok(Json(CheckResponse {
            code: code.0,
            allowed: decision.is_allowed(),
            reason: decision.to_string(),
        }))
    }
}
