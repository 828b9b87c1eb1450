//! AILingo CLI
//!
//! Command-line interface for AI image generation in your own language.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    match ailingo_cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Empty messages come from clap, which already printed its own.
            let msg = e.to_string();
            if !msg.is_empty() {
                eprintln!("Error: {e}");

                if let Some(hint) = e.hint() {
                    eprintln!();
                    eprintln!("{hint}");
                }
            }

            let code = e.exit_code();
            ExitCode::from(code as u8)
        },
    }
}
