use std::fmt;

use crate::config::EnvironmentProvider;
use crate::config::errors::ConfigError;

pub const JWT_SECRET_MIN_LENGTH: usize = 32;
pub const PASSWORD_PEPPER_MIN_LENGTH: usize = 16;
pub const DEFAULT_JWT_EXPIRATION_MINUTES: i64 = 60;

/// Centralized holder of application secrets
pub struct SecretManager {
    jwt_secret: String,
    password_pepper: String,
    jwt_expiration_minutes: i64,
}

impl SecretManager {
    /// Load and validate all secrets
    ///
    /// # Errors
    /// `ConfigError` if a required secret is missing or too short, or the
    /// token lifetime is not a positive number of minutes
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let jwt_secret = load_secret(env, "JWT_SECRET", JWT_SECRET_MIN_LENGTH)?;
        let password_pepper = load_secret(env, "PASSWORD_PEPPER", PASSWORD_PEPPER_MIN_LENGTH)?;

        let jwt_expiration_minutes = match env.get_var("JWT_EXPIRATION_MINUTES") {
            None => DEFAULT_JWT_EXPIRATION_MINUTES,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(minutes) if minutes > 0 => minutes,
                _ => {
                    return Err(ConfigError::invalid_setting(
                        "JWT_EXPIRATION_MINUTES",
                        format!("'{}' is not a positive number of minutes", raw),
                    ));
                }
            },
        };

        Ok(Self {
            jwt_secret,
            password_pepper,
            jwt_expiration_minutes,
        })
    }

    /// Build directly from values, bypassing the environment
    pub fn new(jwt_secret: String, password_pepper: String, jwt_expiration_minutes: i64) -> Self {
        Self {
            jwt_secret,
            password_pepper,
            jwt_expiration_minutes,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Secret mixed into every argon2 hash
    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    pub fn jwt_expiration_minutes(&self) -> i64 {
        self.jwt_expiration_minutes
    }
}

fn load_secret(env: &dyn EnvironmentProvider, name: &str, min_length: usize) -> Result<String, ConfigError> {
    let value = env.get_var(name).ok_or_else(|| ConfigError::MissingSecret {
        secret_name: name.to_string(),
    })?;

    if value.len() < min_length {
        return Err(ConfigError::SecretTooShort {
            secret_name: name.to_string(),
            expected: min_length,
            actual: value.len(),
        });
    }

    Ok(value)
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .finish()
    }
}
