use std::sync::Arc;

use crate::AppData;
use crate::errors::InternalError;
use crate::providers::{AuthenticationProvider, IssuedToken, TokenProvider};
use crate::stores::EntityGraph;
use crate::types::internal::context::RequestContext;
use crate::types::internal::{Level, UserId};

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user_id: UserId,
    pub username: String,
    pub level: Level,
    pub token: IssuedToken,
}

pub struct LoginCoordinator {
    authentication_provider: Arc<AuthenticationProvider>,
    token_provider: Arc<TokenProvider>,
    graph: Arc<dyn EntityGraph>,
}

impl LoginCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            authentication_provider: Arc::clone(&app_data.authentication_provider),
            token_provider: Arc::clone(&app_data.token_provider),
            graph: Arc::clone(&app_data.graph),
        }
    }

    /// Verify credentials, stamp `last_login_at` and issue a JWT
    pub async fn login(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, InternalError> {
        let user = match self.authentication_provider.verify_credentials(username, password).await {
            Ok(user) => user,
            Err(e) => {
                tracing::info!(request_id = %ctx.request_id, ip = ?ctx.ip_address, username, "login failed");
                return Err(e);
            }
        };

        let level: Level = user
            .level
            .parse()
            .map_err(|e| InternalError::parse("level", format!("user {}: {}", user.id, e)))?;

        let token = self.token_provider.generate_jwt(user.id, &user.username, level)?;
        self.graph.touch_last_login(user.id).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = user.id,
            level = %level,
            jti = %token.jti,
            "login succeeded"
        );

        Ok(LoginOutcome {
            user_id: user.id,
            username: user.username,
            level,
            token,
        })
    }
}
