//! Clients for the collaborator services and the command execution context.
//!
//! Each collaborator sits behind a trait ([`TranslationService`],
//! [`ImageGenerator`]) so the resolver and pipeline can be driven by test
//! doubles; the HTTP implementations share one `reqwest` client.

pub mod auth;
mod generate;
mod translate;

use std::sync::Arc;
use std::time::Duration;

pub use auth::AuthClient;
pub use generate::{GenerateError, HttpImageGenerator, ImageGenerator};
pub use translate::{
    HttpTranslationService, OfflineTranslationService, TranslateError, TranslationService,
    parse_translated,
};

use crate::config::{Config, TokenStorage};
use crate::error::{Error, Result};
use crate::generation::{GenerationGate, GenerationPipeline};
use crate::i18n::{Locale, LocaleCatalog, TranslationResolver, detect_locale, resolve_locale};
use crate::output::Output;
use crate::session::{FileStorage, KeyringStorage, Session, Storage};

/// Attach the project key the hosted functions expect.
pub(crate) fn apply_api_key(
    request: reqwest::RequestBuilder,
    api_key: Option<&str>,
) -> reqwest::RequestBuilder {
    match api_key {
        Some(key) => request.bearer_auth(key).header("apikey", key),
        None => request,
    }
}

/// Build the shared HTTP client.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("ailingo-cli/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .map_err(Error::from)
}

/// Context for CLI command execution.
///
/// Contains everything needed to execute CLI commands:
/// - Configuration
/// - Output writer
/// - Session (token and generation counter)
/// - Translation resolver for the selected locale
pub struct Context {
    /// CLI configuration.
    pub config: Config,

    /// Output configuration.
    pub output: Output,

    /// Persisted session state.
    pub session: Session,

    /// UI string resolver.
    pub resolver: TranslationResolver,

    /// Locale selected for this invocation.
    pub locale: Locale,

    /// Shared HTTP client.
    pub http: reqwest::Client,
}

impl Context {
    /// Create a new context from CLI options.
    pub fn new(
        locale: Option<String>,
        output_format: String,
        color: String,
        quiet: bool,
    ) -> Result<Self> {
        let config = Config::load()?;
        let output = Output::from_cli(&output_format, &color, quiet)?;
        Self::with_config(config, output, locale.as_deref())
    }

    /// Create a context from an already loaded configuration.
    pub fn with_config(config: Config, output: Output, locale: Option<&str>) -> Result<Self> {
        let locale = select_locale(locale, config.locale.as_deref())?;
        let http = http_client(Duration::from_secs(config.timeout_secs))?;
        let session = open_session(&config)?;

        let service: Arc<dyn TranslationService> = match config.translate_url()? {
            Some(endpoint) => {
                Arc::new(HttpTranslationService::new(http.clone(), endpoint, config.api_key.clone()))
            },
            None => Arc::new(OfflineTranslationService),
        };
        let resolver = TranslationResolver::new(Arc::new(LocaleCatalog::embedded()), service);

        Ok(Self { config, output, session, resolver, locale, http })
    }

    /// Start resolving UI strings for the selected locale.
    ///
    /// Returns the background translation task, if one was started.
    pub fn start_translation(&self) -> Option<tokio::task::JoinHandle<()>> {
        self.resolver.select_locale(self.locale)
    }

    /// Build the generation pipeline for this session.
    pub fn pipeline(&self) -> Result<GenerationPipeline> {
        let endpoint = self.config.generate_url()?;
        let generator =
            HttpImageGenerator::new(self.http.clone(), endpoint, self.config.api_key.clone());

        Ok(GenerationPipeline::new(
            self.session.clone(),
            GenerationGate::new(self.config.free_limit),
            Arc::new(generator),
            self.resolver.clone(),
        ))
    }

    /// Client for the account service.
    pub fn auth_client(&self) -> Result<AuthClient> {
        Ok(AuthClient::new(self.http.clone(), self.config.auth_url()?))
    }

    /// Check if the user is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

/// Explicit choices must be supported; the environment falls back to English.
fn select_locale(flag: Option<&str>, configured: Option<&str>) -> Result<Locale> {
    match flag.or(configured) {
        Some(code) => code.parse(),
        None => Ok(resolve_locale(&detect_locale())),
    }
}

fn open_session(config: &Config) -> Result<Session> {
    let dir = config.session_dir()?;
    let counters: Arc<dyn Storage> = Arc::new(FileStorage::new(&dir));
    let tokens: Arc<dyn Storage> = match config.token_storage {
        TokenStorage::File => Arc::clone(&counters),
        TokenStorage::Keyring => Arc::new(KeyringStorage::new()),
    };
    Ok(Session::new(tokens, counters))
}
