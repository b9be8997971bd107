use std::fmt;

use crate::config::EnvironmentProvider;
use crate::config::errors::ConfigError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://erp_admin.db?mode=rwc";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Infrastructure settings needed before anything else starts
pub struct BootstrapSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
}

impl BootstrapSettings {
    /// Load bootstrap settings from the given environment
    ///
    /// # Errors
    /// `ConfigError::InvalidSetting` for an empty database url or host, or a
    /// port outside 1..=65535
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, ConfigError> {
        let database_url = env.get_var_or("DATABASE_URL", DEFAULT_DATABASE_URL);
        if database_url.trim().is_empty() {
            return Err(ConfigError::invalid_setting("DATABASE_URL", "cannot be empty"));
        }

        let server_host = env.get_var_or("HOST", DEFAULT_HOST);
        if server_host.trim().is_empty() {
            return Err(ConfigError::invalid_setting("HOST", "cannot be empty"));
        }

        let server_port = match env.get_var("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => parse_port(&raw)?,
        };

        Ok(Self {
            database_url,
            server_host,
            server_port,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    match raw.trim().parse::<u16>() {
        Ok(0) => Err(ConfigError::invalid_setting("PORT", "0 is outside valid range 1-65535")),
        Ok(port) => Ok(port),
        Err(_) => Err(ConfigError::invalid_setting(
            "PORT",
            format!("'{}' is not a port number between 1 and 65535", raw),
        )),
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}
