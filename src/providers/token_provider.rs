use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::internal::auth::Claims;
use crate::types::internal::{Level, UserId};

/// A freshly signed access token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub expires_at: i64,
    pub expires_in: i64,
}

/// HS256 JWT issuance and validation
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>) -> Self {
        Self { secret_manager }
    }

    /// Sign a token carrying `sub`, `username` and `level`
    pub fn generate_jwt(&self, user_id: UserId, username: &str, level: Level) -> Result<IssuedToken, InternalError> {
        let now = Utc::now().timestamp();
        let expires_in = self.secret_manager.jwt_expiration_minutes() * 60;
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            level: Some(level.as_str().to_string()),
            role: None,
            exp: now + expires_in,
            iat: now,
            jti: jti.clone(),
        };

        let token = self.encode_claims(&claims)?;
        tracing::debug!(user_id, jti = %jti, "JWT issued");

        Ok(IssuedToken {
            token,
            jti,
            expires_at: claims.exp,
            expires_in,
        })
    }

    /// Validate signature and expiry and return the claims
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => CredentialError::ExpiredToken("jwt".to_string()).into(),
            _ => {
                tracing::debug!("JWT rejected: {}", e);
                CredentialError::invalid_token("jwt", "invalid signature or malformed").into()
            }
        })
    }

    pub(crate) fn encode_claims(&self, claims: &Claims) -> Result<String, InternalError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", e.to_string()))
    }
}
