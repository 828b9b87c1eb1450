//! Command-line argument parsing and command definitions.
//!
//! Uses clap with derive macros for type-safe argument parsing.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};

/// AILingo CLI - AI images from prompts in your own language
#[derive(Parser, Debug)]
#[command(name = "ailingo")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// UI locale (e.g. en, fr, ja); detected from the environment when unset
    #[arg(long, global = true, env = "AILINGO_LOCALE")]
    pub locale: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table", value_parser = ["table", "json", "yaml"])]
    pub output: String,

    /// Color output mode
    #[arg(long, global = true, default_value = "auto", value_parser = ["auto", "always", "never"])]
    pub color: String,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an image from a prompt
    Generate {
        /// Prompt describing the image (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        /// Save the image into this directory
        #[arg(long, value_name = "DIR")]
        download: Option<PathBuf>,

        /// Open the image in the browser
        #[arg(long)]
        open: bool,
    },

    /// Show the UI strings for the selected locale
    Strings {
        /// Show a single key
        #[arg(long)]
        key: Option<String>,

        /// Seconds to wait for the remote translation
        #[arg(long, default_value = "10", value_name = "SECS")]
        wait: u64,
    },

    /// List supported locales
    Locales,

    /// Log in with an existing token or email and password
    #[command(group(ArgGroup::new("method").required(true).args(["token", "email"])))]
    Login {
        /// Store this token as-is
        #[arg(long, conflicts_with_all = ["email", "password"])]
        token: Option<String>,

        /// Account email
        #[arg(long, requires = "password")]
        email: Option<String>,

        /// Account password
        #[arg(long, env = "AILINGO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        /// Display name
        #[arg(long)]
        name: String,

        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long, env = "AILINGO_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Remove the stored token
    Logout,

    /// Show session, quota and endpoint status
    Status,

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Shell types for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    PowerShell,
}
