use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::CryptoProvider;
use crate::stores::EntityGraph;
use crate::types::internal::graph::UserForAuth;

/// Username/password verification
pub struct AuthenticationProvider {
    graph: Arc<dyn EntityGraph>,
    crypto: Arc<CryptoProvider>,
}

impl AuthenticationProvider {
    pub fn new(graph: Arc<dyn EntityGraph>, crypto: Arc<CryptoProvider>) -> Self {
        Self { graph, crypto }
    }

    /// Unknown, soft-deleted and wrong-password logins all fail the same way
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<UserForAuth, InternalError> {
        let Some(user) = self.graph.credentials_for_username(username).await? else {
            tracing::debug!(username, "login for unknown user");
            return Err(CredentialError::InvalidCredentials.into());
        };

        if !self.crypto.verify_password(&user.password_hash, password).await? {
            tracing::debug!(username, "login with wrong password");
            return Err(CredentialError::InvalidCredentials.into());
        }

        Ok(user)
    }
}
