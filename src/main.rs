use std::sync::Arc;

use clap::Parser;
use poem::{Route, Server, listener::TcpListener};
use poem_openapi::OpenApiService;

use erp_admin_backend::AppData;
use erp_admin_backend::api::{AuthApi, HealthApi, PermissionsApi, RolesApi, UsersApi};
use erp_admin_backend::cli::{Cli, Commands, execute_command};
use erp_admin_backend::config::{
    BootstrapSettings, SecretManager, SystemEnvironment, init_database, init_logging, migrate_database,
};
use erp_admin_backend::coordinators::{AdminCoordinator, LoginCoordinator, UserCoordinator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let env = SystemEnvironment;
    init_logging(&env)?;

    let cli = Cli::parse();
    let settings = BootstrapSettings::from_env_provider(&env)?;

    let command = cli.command();
    if command == Commands::Migrate {
        return execute_command(command, &settings, None).await;
    }

    let secret_manager = Arc::new(SecretManager::from_env_provider(&env)?);
    let db = init_database(&settings).await?;
    migrate_database(&db).await?;

    let app_data = Arc::new(AppData::new(db, secret_manager));

    if command != Commands::Serve {
        return execute_command(command, &settings, Some(app_data.as_ref())).await;
    }

    serve(app_data, &settings).await?;
    Ok(())
}

async fn serve(app_data: Arc<AppData>, settings: &BootstrapSettings) -> Result<(), std::io::Error> {
    let login_coordinator = Arc::new(LoginCoordinator::new(Arc::clone(&app_data)));
    let user_coordinator = Arc::new(UserCoordinator::new(Arc::clone(&app_data)));
    let admin_coordinator = Arc::new(AdminCoordinator::new(Arc::clone(&app_data)));
    let token_provider = Arc::clone(&app_data.token_provider);

    let auth_api = AuthApi::new(login_coordinator, Arc::clone(&user_coordinator), Arc::clone(&token_provider));
    let users_api = UsersApi::new(user_coordinator, Arc::clone(&token_provider));
    let roles_api = RolesApi::new(Arc::clone(&admin_coordinator), Arc::clone(&token_provider));
    let permissions_api = PermissionsApi::new(admin_coordinator, token_provider);

    let address = settings.server_address();
    let api_service = OpenApiService::new(
        (HealthApi, auth_api, users_api, roles_api, permissions_api),
        "ERP Admin API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("http://{}/api", address));

    // Generate Swagger UI from OpenAPI service
    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger", address);

    Server::new(TcpListener::bind(address)).run(app).await
}
