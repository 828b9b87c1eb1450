//! Authentication commands: login, logout, register.

use crate::client::Context;
use crate::error::{Error, Result};
use crate::session::AuthToken;

/// Store a token, either given directly or issued for email and password.
pub async fn login(
    ctx: &Context,
    token: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
) -> Result<()> {
    let token = match (token, email, password) {
        (Some(raw), _, _) => {
            AuthToken::new(raw).ok_or_else(|| Error::invalid_arg("Token must not be blank"))?
        },
        (None, Some(email), Some(password)) => {
            ctx.output.info(&format!("Logging in as {email}..."));
            ctx.auth_client()?.login(email, password).await?
        },
        _ => return Err(Error::invalid_arg("Pass --token, or --email with --password")),
    };

    ctx.session.store_token(&token)?;
    ctx.output.success("Logged in");
    Ok(())
}

/// Create an account.
pub async fn register(ctx: &Context, name: &str, email: &str, password: &str) -> Result<()> {
    if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(Error::invalid_arg("Name, email and password are required"));
    }

    ctx.auth_client()?.register(name.trim(), email.trim(), password).await?;
    ctx.output.success(&format!("Account created for {}", email.trim()));
    ctx.output.info(&format!("Run 'ailingo login --email {}' to log in.", email.trim()));
    Ok(())
}

/// Remove the stored token.
pub async fn logout(ctx: &Context) -> Result<()> {
    if !ctx.is_authenticated() {
        ctx.output.info("Not logged in");
        return Ok(());
    }

    ctx.session.clear_token()?;
    ctx.output.success("Logged out");
    Ok(())
}
