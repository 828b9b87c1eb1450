//! AILingo CLI Library
//!
//! Generate AI images from prompts written in any supported language, with
//! UI strings translated on the fly and a small free-use quota per client.
//!
//! ## Usage
//!
//! ```bash
//! ailingo register --name Ana --email ana@example.com --password ...
//! ailingo login --email ana@example.com --password ...
//! ailingo --locale fr generate "un renard roux dans la neige" --download .
//! ailingo --locale ja strings
//! ```
//!
//! ## Layout
//!
//! - [`i18n`]: embedded string tables and the remote-translation resolver
//! - [`session`]: persisted token and generation counter
//! - [`generation`]: the free-use gate and the request pipeline
//! - [`client`]: collaborator service clients and the command context

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod generation;
pub mod i18n;
pub mod output;
pub mod session;

pub use cli::Cli;
pub use error::{Error, Result};

/// CLI version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the CLI with the given arguments.
///
/// This is the main entry point for the CLI, parsing arguments and
/// dispatching to the appropriate command handler.
pub async fn run(args: Vec<String>) -> Result<()> {
    use clap::Parser;

    let cli_args = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => {
            // Print clap error (includes help/version)
            e.print().ok();
            use clap::error::ErrorKind;
            match e.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => return Ok(()),
                _ => return Err(Error::other("")),
            }
        },
    };

    if cli_args.debug {
        init_logging();
    }

    // Completions need no configuration or session.
    if let cli::Commands::Completion { shell } = cli_args.command {
        return commands::completion(shell);
    }

    let ctx =
        client::Context::new(cli_args.locale, cli_args.output, cli_args.color, cli_args.quiet)?;

    commands::execute(&ctx, &cli_args.command).await
}

/// Initialize tracing/logging for debug mode.
fn init_logging() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ailingo_cli=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
