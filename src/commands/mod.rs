//! Command implementations for the AILingo CLI.
//!
//! Each submodule implements a group of related commands.

mod auth;
mod generate;
mod status;
mod strings;

pub use auth::{login, logout, register};
pub use generate::generate;
pub use status::{StatusView, status};
pub use strings::{LocaleRow, StringRow, locales, strings};

use crate::cli::{Commands, Shell};
use crate::client::Context;
use crate::error::Result;

/// Execute a CLI command.
pub async fn execute(ctx: &Context, command: &Commands) -> Result<()> {
    match command {
        Commands::Generate { prompt, download, open } => {
            generate(ctx, prompt, download.as_deref(), *open).await
        },
        Commands::Strings { key, wait } => strings(ctx, key.as_deref(), *wait).await,
        Commands::Locales => locales(ctx).await,

        Commands::Login { token, email, password } => {
            login(ctx, token.as_deref(), email.as_deref(), password.as_deref()).await
        },
        Commands::Register { name, email, password } => {
            register(ctx, name, email, password).await
        },
        Commands::Logout => logout(ctx).await,
        Commands::Status => status(ctx).await,

        Commands::Completion { shell } => completion(*shell),
    }
}

/// Print shell completions to stdout.
pub fn completion(shell: Shell) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::Generator;

    let mut cmd = crate::cli::Cli::command();

    fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
        clap_complete::generate(generator, cmd, cmd.get_name().to_string(), &mut std::io::stdout());
    }

    match shell {
        Shell::Bash => print_completions(clap_complete::shells::Bash, &mut cmd),
        Shell::Zsh => print_completions(clap_complete::shells::Zsh, &mut cmd),
        Shell::Fish => print_completions(clap_complete::shells::Fish, &mut cmd),
        Shell::PowerShell => print_completions(clap_complete::shells::PowerShell, &mut cmd),
    }

    Ok(())
}
