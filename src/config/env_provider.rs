#[cfg(test)]
use std::collections::HashMap;

/// Source of environment variables
///
/// Settings and secrets read through this trait so tests can supply values
/// without touching the process environment.
pub trait EnvironmentProvider: Send + Sync {
    fn get_var(&self, key: &str) -> Option<String>;

    /// Value of `key`, or `default` when unset
    fn get_var_or(&self, key: &str, default: &str) -> String {
        self.get_var(key).unwrap_or_else(|| default.to_string())
    }
}

/// Reads the real process environment (after `.env` has been loaded)
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment for tests
#[cfg(test)]
#[derive(Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvironment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_vars(mut self, vars: &[(&str, &str)]) -> Self {
        for (key, value) in vars {
            self.vars.insert(key.to_string(), value.to_string());
        }
        self
    }
}

#[cfg(test)]
impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_environment_returns_configured_values() {
        let provider = MockEnvironment::empty()
            .with_var("DATABASE_URL", "sqlite::memory:")
            .with_vars(&[("HOST", "127.0.0.1"), ("PORT", "8080")]);

        assert_eq!(provider.get_var("DATABASE_URL"), Some("sqlite::memory:".to_string()));
        assert_eq!(provider.get_var("PORT"), Some("8080".to_string()));
        assert_eq!(provider.get_var("LOG_LEVEL"), None);
    }

    #[test]
    fn test_get_var_or_falls_back_to_default() {
        let provider = MockEnvironment::empty().with_var("HOST", "127.0.0.1");

        assert_eq!(provider.get_var_or("HOST", "0.0.0.0"), "127.0.0.1");
        assert_eq!(provider.get_var_or("PORT", "3000"), "3000");
    }
}
