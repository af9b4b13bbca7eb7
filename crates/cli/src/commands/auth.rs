//! Sign-in commands.
//!
//! # Usage
//!
//! ```bash
//! FREIGHTDESK_PASSWORD=... fd-cli login -e dana@freightdesk.dev
//! fd-cli whoami
//! fd-cli logout
//! ```

use std::io::Write;

use freightdesk_admin::services::AuthService;
use secrecy::SecretString;

use super::{CommandError, Context};

/// Sign in and persist the token.
pub async fn login(ctx: &Context, email: &str, password: SecretString) -> Result<(), CommandError> {
    let user = AuthService::new(&ctx.api, &ctx.session)
        .login(email, &password)
        .await?;

    tracing::info!(user_id = %user.id, "Signed in");
    writeln!(std::io::stdout().lock(), "Signed in as {} <{}>", user.name, user.email)?;
    Ok(())
}

/// Revoke the token and forget the session.
pub async fn logout(ctx: &Context) -> Result<(), CommandError> {
    let was_signed_in = ctx.session.access_token().is_some();
    AuthService::new(&ctx.api, &ctx.session).logout().await?;

    let message = if was_signed_in { "Signed out." } else { "Not signed in." };
    writeln!(std::io::stdout().lock(), "{message}")?;
    Ok(())
}

/// Print the user behind the stored token, as the backend sees it now.
pub async fn whoami(ctx: &Context) -> Result<(), CommandError> {
    let user = AuthService::new(&ctx.api, &ctx.session)
        .refresh_user()
        .await?
        .ok_or(CommandError::NotSignedIn)?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "{} <{}>", user.name, user.email)?;
    if !user.roles.is_empty() {
        let roles: Vec<&str> = user.roles.iter().map(|r| r.name.as_str()).collect();
        writeln!(out, "Roles: {}", roles.join(", "))?;
    }
    if !user.permissions.is_empty() {
        writeln!(out, "Permissions: {}", user.permissions.len())?;
    }
    Ok(())
}
