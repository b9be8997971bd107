// Bootstrap command implementation
// Creates the first account as super_admin during system setup

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::types::internal::context::RequestContext;
use crate::types::internal::graph::UserRecord;

/// Create the bootstrap super_admin and report the outcome on stdout
///
/// A generated password is printed exactly once and never logged.
pub async fn bootstrap_system(
    app_data: &AppData,
    username: String,
    email: String,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== ERP Admin Bootstrap ===\n");

    let ctx = RequestContext::for_cli("bootstrap");
    let generated = password.is_none();
    let password = password.unwrap_or_else(|| app_data.crypto_provider.generate_secure_password());

    let user = create_bootstrap_user(app_data, &ctx, username, email, &password).await?;

    println!("Created super_admin '{}' (id {})", user.username, user.id);
    if generated {
        println!("\nGenerated password (shown once, store it now):\n\n    {}\n", password);
    }

    Ok(())
}

/// Create the bootstrap account through the same rules as the API
pub async fn create_bootstrap_user(
    app_data: &AppData,
    ctx: &RequestContext,
    username: String,
    email: String,
    password: &str,
) -> Result<UserRecord, InternalError> {
    let user = app_data
        .user_provider
        .bootstrap_super_admin(username, email, password)
        .await?;

    tracing::info!(
        request_id = %ctx.request_id,
        actor = %ctx.actor_id,
        user_id = user.id,
        "bootstrap super_admin created"
    );

    Ok(user)
}
