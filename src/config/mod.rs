mod bootstrap_settings;
mod database;
mod env_provider;
mod errors;
mod logging;
mod secret_manager;

pub use bootstrap_settings::BootstrapSettings;
pub use database::{init_database, migrate_database};
#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use errors::ConfigError;
pub use logging::init_logging;
pub use secret_manager::SecretManager;
