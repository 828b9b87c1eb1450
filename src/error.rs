//! Error types for the AILingo CLI.
//!
//! This module provides structured error handling with semantic exit codes.
//! Domain outcomes of the generation pipeline are not errors (see
//! [`crate::generation::GenerationResult`]); the `generate` command converts a
//! failed result into [`Error::Generation`] so the process exit code reflects it.

use std::io;
use thiserror::Error;

use crate::generation::{FailureReason, Surface};

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (invalid config file, missing required values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication required but not available.
    #[error("Authentication required. Run 'ailingo login' first.")]
    AuthRequired,

    /// Locale code outside the supported set.
    #[error("Unsupported locale '{0}'. Run 'ailingo locales' to see supported locales.")]
    UnsupportedLocale(String),

    /// A generation request ended in a failure result.
    #[error("{message}")]
    Generation {
        /// Why the request failed.
        reason: FailureReason,
        /// User-facing, translated message.
        message: String,
    },

    /// Download requested without a successful generation.
    #[error("Nothing to download: the last generation did not succeed")]
    NothingToDownload,

    /// Auth collaborator rejected a login or registration.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error (file operations, network, etc.).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid command-line argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Keyring/credential storage error.
    #[error("Credential storage error: {0}")]
    Credential(String),

    /// General/unspecified error.
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the exit code for this error type.
    ///
    /// - 0: Success
    /// - 1: General error
    /// - 2: Invalid arguments or configuration
    /// - 3: Authentication required
    /// - 4: Free quota exhausted
    /// - 7: Rate limited
    /// - 8: Payment required
    /// - 10: Network error
    /// - 11: Generation service failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) | Error::InvalidArgument(_) | Error::UnsupportedLocale(_) => 2,

            Error::AuthRequired | Error::Credential(_) | Error::Auth(_) => 3,

            Error::Generation { reason, .. } => match reason {
                FailureReason::EmptyPrompt | FailureReason::PromptTooLong => 2,
                FailureReason::AuthRequired => 3,
                FailureReason::QuotaExceeded => 4,
                FailureReason::RateLimited => 7,
                FailureReason::PaymentRequired => 8,
                FailureReason::GenerationFailed => 11,
                FailureReason::Busy => 1,
            },

            Error::Http(_) | Error::Io(_) => 10,

            Error::NothingToDownload | Error::Json(_) | Error::Yaml(_) | Error::Other(_) => 1,
        }
    }

    /// Follow-up command to print after the error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Generation { reason, .. } => match reason.redirect() {
                Some(Surface::Register) => Some("Run 'ailingo register' to create an account."),
                None => None,
            },
            Error::AuthRequired | Error::Credential(_) => Some("Run 'ailingo login' to authenticate."),
            _ => None,
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_arg(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create an auth collaborator error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Error::Auth(msg.into())
    }

    /// Create a general error.
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}

impl From<keyring::Error> for Error {
    fn from(err: keyring::Error) -> Self {
        Error::Credential(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::AuthRequired.exit_code(), 3);
        assert_eq!(Error::UnsupportedLocale("xx".into()).exit_code(), 2);
        assert_eq!(
            Error::Generation { reason: FailureReason::QuotaExceeded, message: String::new() }
                .exit_code(),
            4
        );
        assert_eq!(
            Error::Generation { reason: FailureReason::RateLimited, message: String::new() }
                .exit_code(),
            7
        );
    }

    #[test]
    fn test_hints() {
        let login = Some("Run 'ailingo login' to authenticate.");
        assert_eq!(Error::AuthRequired.hint(), login);
        assert_eq!(Error::Credential("test".into()).hint(), login);
        assert_eq!(
            Error::Generation { reason: FailureReason::AuthRequired, message: String::new() }
                .hint(),
            Some("Run 'ailingo register' to create an account.")
        );
        assert_eq!(
            Error::Generation { reason: FailureReason::QuotaExceeded, message: String::new() }
                .hint(),
            None
        );
        assert_eq!(Error::Config("test".into()).hint(), None);
    }
}
