use thiserror::Error;

/// Failures while loading configuration at startup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Required secret '{secret_name}' is missing")]
    MissingSecret { secret_name: String },

    #[error("Secret '{secret_name}' must be at least {expected} characters, got {actual}")]
    SecretTooShort {
        secret_name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid value for {setting_name}: {reason}")]
    InvalidSetting { setting_name: String, reason: String },
}

impl ConfigError {
    pub fn invalid_setting(setting_name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            setting_name: setting_name.to_string(),
            reason: reason.into(),
        }
    }
}
