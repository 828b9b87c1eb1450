//! `status`: session, quota and endpoint overview.

use std::path::PathBuf;

use serde::Serialize;

use crate::client::Context;
use crate::config::{Endpoints, TokenStorage};
use crate::error::Result;

/// Snapshot printed by `status`.
#[derive(Debug, Serialize)]
pub struct StatusView {
    /// Whether a token is stored.
    pub authenticated: bool,
    /// Completed generations.
    pub generations_used: u64,
    /// Free generations allowed.
    pub free_limit: u64,
    /// Generations left before the gate closes.
    pub remaining: u64,
    /// Selected locale code.
    pub locale: &'static str,
    /// Token backend.
    pub token_storage: TokenStorage,
    /// State directory.
    pub state_dir: PathBuf,
    /// Configured endpoints.
    pub endpoints: Endpoints,
}

impl StatusView {
    fn lines(&self) -> Vec<String> {
        let endpoint = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        vec![
            format!("Authenticated:  {}", if self.authenticated { "yes" } else { "no" }),
            format!(
                "Generations:    {}/{} ({} remaining)",
                self.generations_used, self.free_limit, self.remaining
            ),
            format!("Locale:         {}", self.locale),
            format!("Token storage:  {}", match self.token_storage {
                TokenStorage::File => "file",
                TokenStorage::Keyring => "keyring",
            }),
            format!("State dir:      {}", self.state_dir.display()),
            format!("Translate URL:  {}", endpoint(&self.endpoints.translate)),
            format!("Generate URL:   {}", endpoint(&self.endpoints.generate)),
            format!("Auth URL:       {}", endpoint(&self.endpoints.auth)),
        ]
    }
}

/// Show session and configuration status.
pub async fn status(ctx: &Context) -> Result<()> {
    let used = ctx.session.quota().read();
    let view = StatusView {
        authenticated: ctx.is_authenticated(),
        generations_used: used,
        free_limit: ctx.config.free_limit,
        remaining: ctx.config.free_limit.saturating_sub(used),
        locale: ctx.locale.code(),
        token_storage: ctx.config.token_storage,
        state_dir: ctx.config.session_dir()?,
        endpoints: ctx.config.endpoints.clone(),
    };

    ctx.output.value(&view, || view.lines())
}
