//! Configuration system for the AILingo CLI.
//!
//! The configuration follows XDG Base Directory Specification and supports:
//! - User config: `~/.config/ailingo/cli.yaml`
//! - Project config: `.ailingo-cli.yaml` in current directory
//! - Environment variables: `AILINGO_*`
//! - Command-line flags (highest precedence)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::generation::FREE_LIMIT;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Main CLI configuration, after every source has been applied.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Collaborator endpoints.
    pub endpoints: Endpoints,

    /// Project key sent to the translation and generation services.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Preferred UI locale code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Free generations allowed per client.
    pub free_limit: u64,

    /// HTTP request timeout.
    pub timeout_secs: u64,

    /// Where the auth token is kept.
    pub token_storage: TokenStorage,

    /// Override for the persisted state directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Collaborator service URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Translation service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate: Option<String>,

    /// Image generation service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate: Option<String>,

    /// Auth service base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<String>,
}

/// Backend for the auth token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    /// A file in the state directory.
    #[default]
    File,
    /// The OS keychain.
    Keyring,
}

/// Output formatting configuration.
#[derive(Debug, Clone, Serialize)]
pub struct OutputConfig {
    /// Default output format (table, json, yaml).
    pub format: String,

    /// Color output mode (auto, always, never).
    pub color: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: "table".to_string(), color: "auto".to_string() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_layers(std::iter::empty())
    }
}

/// One configuration file as written on disk. Absent keys stay `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    /// Collaborator endpoints.
    pub endpoints: Endpoints,
    /// Project key.
    pub api_key: Option<String>,
    /// Preferred UI locale code.
    pub locale: Option<String>,
    /// Free generations allowed per client.
    pub free_limit: Option<u64>,
    /// HTTP request timeout.
    pub timeout_secs: Option<u64>,
    /// Token backend.
    pub token_storage: Option<TokenStorage>,
    /// State directory override.
    pub state_dir: Option<PathBuf>,
    /// Output settings.
    pub output: OutputLayer,
}

/// Output settings of a single layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputLayer {
    /// Output format.
    pub format: Option<String>,
    /// Color mode.
    pub color: Option<String>,
}

impl ConfigLayer {
    /// Overlay `other` onto this layer; keys set in `other` win.
    fn merge(&mut self, other: Self) {
        let Endpoints { translate, generate, auth } = other.endpoints;
        self.endpoints.translate = translate.or(self.endpoints.translate.take());
        self.endpoints.generate = generate.or(self.endpoints.generate.take());
        self.endpoints.auth = auth.or(self.endpoints.auth.take());

        self.api_key = other.api_key.or(self.api_key.take());
        self.locale = other.locale.or(self.locale.take());
        self.free_limit = other.free_limit.or(self.free_limit);
        self.timeout_secs = other.timeout_secs.or(self.timeout_secs);
        self.token_storage = other.token_storage.or(self.token_storage);
        self.state_dir = other.state_dir.or(self.state_dir.take());
        self.output.format = other.output.format.or(self.output.format.take());
        self.output.color = other.output.color.or(self.output.color.take());
    }
}

impl Config {
    /// Load configuration from all sources with proper precedence.
    ///
    /// Resolution order (highest to lowest):
    /// 1. CLI flags (handled separately)
    /// 2. Environment variables
    /// 3. Project config (`.ailingo-cli.yaml`)
    /// 4. User config (`~/.config/ailingo/cli.yaml`)
    /// 5. Defaults
    pub fn load() -> Result<Self> {
        let mut layers = Vec::new();

        if let Some(path) = Self::user_config_path()
            && path.exists()
        {
            layers.push(Self::load_from_file(&path)?);
        }

        let project_path = PathBuf::from(".ailingo-cli.yaml");
        if project_path.exists() {
            layers.push(Self::load_from_file(&project_path)?);
        }

        let mut config = Self::from_layers(layers);
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        tracing::debug!(?config.endpoints, free_limit = config.free_limit, "Configuration loaded");
        Ok(config)
    }

    /// Load one configuration layer from a YAML file.
    pub fn load_from_file(path: &Path) -> Result<ConfigLayer> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            Error::config(format!("Failed to parse config file {}: {}", path.display(), e))
        })
    }

    /// Merge layers in order, later ones taking precedence, then fill in defaults.
    pub fn from_layers(layers: impl IntoIterator<Item = ConfigLayer>) -> Self {
        let mut merged = ConfigLayer::default();
        for layer in layers {
            merged.merge(layer);
        }

        let output = OutputConfig::default();
        Self {
            endpoints: merged.endpoints,
            api_key: merged.api_key,
            locale: merged.locale,
            free_limit: merged.free_limit.unwrap_or(FREE_LIMIT),
            timeout_secs: merged.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            token_storage: merged.token_storage.unwrap_or_default(),
            state_dir: merged.state_dir,
            output: OutputConfig {
                format: merged.output.format.unwrap_or(output.format),
                color: merged.output.color.unwrap_or(output.color),
            },
        }
    }

    /// Reject values no command can work with.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than 0"));
        }
        Ok(())
    }

    /// Apply environment variable overrides read through `var`.
    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = var("AILINGO_TRANSLATE_URL") {
            self.endpoints.translate = Some(url);
        }
        if let Some(url) = var("AILINGO_GENERATE_URL") {
            self.endpoints.generate = Some(url);
        }
        if let Some(url) = var("AILINGO_AUTH_URL") {
            self.endpoints.auth = Some(url);
        }
        if let Some(key) = var("AILINGO_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(dir) = var("AILINGO_STATE_DIR") {
            self.state_dir = Some(PathBuf::from(dir));
        }
    }

    /// Translation endpoint, if configured.
    pub fn translate_url(&self) -> Result<Option<Url>> {
        self.endpoints.translate.as_deref().map(|raw| parse_endpoint("translate", raw)).transpose()
    }

    /// Generation endpoint.
    pub fn generate_url(&self) -> Result<Url> {
        let raw = self.endpoints.generate.as_deref().ok_or_else(|| {
            Error::config(
                "No generation endpoint configured. Set endpoints.generate or AILINGO_GENERATE_URL.",
            )
        })?;
        parse_endpoint("generate", raw)
    }

    /// Auth service base URL.
    pub fn auth_url(&self) -> Result<Url> {
        let raw = self.endpoints.auth.as_deref().ok_or_else(|| {
            Error::config("No auth endpoint configured. Set endpoints.auth or AILINGO_AUTH_URL.")
        })?;
        parse_endpoint("auth", raw)
    }

    /// Directory holding the persisted session entries.
    pub fn session_dir(&self) -> Result<PathBuf> {
        self.state_dir
            .clone()
            .or_else(Self::state_dir)
            .ok_or_else(|| Error::config("Cannot determine state directory"))
    }

    /// Get the path to the user config file.
    ///
    /// Follows XDG Base Directory Specification:
    /// - Uses `XDG_CONFIG_HOME/ailingo/cli.yaml` if set
    /// - Falls back to `~/.config/ailingo/cli.yaml`
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("cli.yaml"))
    }

    /// Get the path to the user config directory.
    ///
    /// Cross-platform behavior:
    /// - If `XDG_CONFIG_HOME` is set, uses `$XDG_CONFIG_HOME/ailingo`
    /// - Linux/macOS: Falls back to `~/.config/ailingo` (XDG default)
    /// - Windows: Falls back to `%APPDATA%\ailingo`
    #[must_use]
    pub fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config.is_empty()
        {
            return Some(PathBuf::from(xdg_config).join("ailingo"));
        }

        #[cfg(windows)]
        {
            dirs::config_dir().map(|p| p.join("ailingo"))
        }

        #[cfg(not(windows))]
        {
            dirs::home_dir().map(|p| p.join(".config").join("ailingo"))
        }
    }

    /// Get the path to the state directory.
    ///
    /// Cross-platform behavior:
    /// - If `XDG_STATE_HOME` is set, uses `$XDG_STATE_HOME/ailingo`
    /// - Linux/macOS: Falls back to `~/.local/state/ailingo` (XDG default)
    /// - Windows: Falls back to `%LOCALAPPDATA%\ailingo`
    #[must_use]
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME")
            && !xdg_state.is_empty()
        {
            return Some(PathBuf::from(xdg_state).join("ailingo"));
        }

        #[cfg(windows)]
        {
            dirs::data_local_dir().map(|p| p.join("ailingo"))
        }

        #[cfg(not(windows))]
        {
            dirs::home_dir().map(|p| p.join(".local").join("state").join("ailingo"))
        }
    }
}

fn parse_endpoint(name: &str, raw: &str) -> Result<Url> {
    Url::parse(raw.trim())
        .map_err(|e| Error::config(format!("Invalid {name} endpoint '{raw}': {e}")))
}
