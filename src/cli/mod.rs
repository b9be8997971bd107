// CLI module for administrative operations requiring server access

pub mod bootstrap;
pub mod migrate;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;
use crate::config::BootstrapSettings;

/// ERP admin backend
#[derive(Parser)]
#[command(name = "erp-admin")]
#[command(about = "ERP admin backend with level and role based access control", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create the first account as super_admin
    Bootstrap {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        /// Generated and printed once when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

impl Cli {
    /// Subcommand to run; no subcommand means `serve`
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

/// Execute a non-server CLI command
///
/// # Returns
/// * `Ok(())` - Command executed successfully
/// * `Err(...)` - Command execution failed
pub async fn execute_command(
    command: Commands,
    settings: &BootstrapSettings,
    app_data: Option<&AppData>,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve => Err("serve is handled by the server entry point".into()),
        Commands::Migrate => migrate::run_migrations(settings).await,
        Commands::Bootstrap {
            username,
            email,
            password,
        } => {
            let app_data = app_data.ok_or("bootstrap requires an initialized database")?;
            bootstrap::bootstrap_system(app_data, username, email, password).await
        }
    }
}
