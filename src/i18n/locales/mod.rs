//! Supported locales, detection and resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A supported UI language.
///
/// The set is closed and known at build time; every variant has an embedded
/// static string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Locale {
    /// English (canonical table).
    En,
    /// Spanish.
    Es,
    /// French.
    Fr,
    /// German.
    De,
    /// Japanese.
    Ja,
    /// Chinese.
    Zh,
    /// Arabic.
    Ar,
    /// Hindi.
    Hi,
    /// Portuguese.
    Pt,
    /// Russian.
    Ru,
}

/// Every supported locale, in menu order.
pub const SUPPORTED_LOCALES: &[Locale] = &[
    Locale::En,
    Locale::Es,
    Locale::Fr,
    Locale::De,
    Locale::Ja,
    Locale::Zh,
    Locale::Ar,
    Locale::Hi,
    Locale::Pt,
    Locale::Ru,
];

impl Locale {
    /// The canonical locale; its table holds every key.
    pub const DEFAULT: Locale = Locale::En;

    /// Wire code sent to the translation service.
    pub const fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Fr => "fr",
            Locale::De => "de",
            Locale::Ja => "ja",
            Locale::Zh => "zh",
            Locale::Ar => "ar",
            Locale::Hi => "hi",
            Locale::Pt => "pt",
            Locale::Ru => "ru",
        }
    }

    /// Native display name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Es => "Español",
            Locale::Fr => "Français",
            Locale::De => "Deutsch",
            Locale::Ja => "日本語",
            Locale::Zh => "中文",
            Locale::Ar => "العربية",
            Locale::Hi => "हिन्दी",
            Locale::Pt => "Português",
            Locale::Ru => "Русский",
        }
    }

    /// Whether this is the canonical locale.
    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = Error;

    /// Parses a wire code or any BCP 47 / POSIX tag whose language subtag is
    /// supported (`fr`, `fr-CA`, `fr_FR.UTF-8`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_locale(s);
        let language = normalized.split('-').next().unwrap_or("").to_ascii_lowercase();

        SUPPORTED_LOCALES
            .iter()
            .copied()
            .find(|locale| locale.code() == language)
            .ok_or_else(|| Error::UnsupportedLocale(s.to_string()))
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.code().to_string()
    }
}

impl TryFrom<String> for Locale {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Detect the user's preferred locale from environment variables.
///
/// Checks in order:
/// 1. `AILINGO_LOCALE` - explicit override
/// 2. `LC_ALL` - POSIX locale override
/// 3. `LANG` - default POSIX locale
///
/// Returns "en" if no locale is detected.
pub fn detect_locale() -> String {
    if let Ok(locale) = std::env::var("AILINGO_LOCALE")
        && !locale.is_empty()
    {
        return normalize_locale(&locale);
    }

    for var in ["LC_ALL", "LANG"] {
        if let Ok(locale) = std::env::var(var)
            && !locale.is_empty()
            && locale != "C"
            && locale != "POSIX"
        {
            return normalize_locale(&locale);
        }
    }

    Locale::DEFAULT.code().to_string()
}

/// Normalize a locale string to BCP 47 format.
///
/// Examples:
/// - "fr_FR.UTF-8" -> "fr-FR"
/// - "`pt_BR`" -> "pt-BR"
/// - "ja" -> "ja"
pub fn normalize_locale(locale: &str) -> String {
    // Remove encoding suffix (e.g., ".UTF-8") and modifier (e.g., "@euro")
    let locale = locale.split('.').next().unwrap_or(locale);
    let locale = locale.split('@').next().unwrap_or(locale);

    locale.trim().replace('_', "-")
}

/// Resolve a detected locale string to a supported locale.
///
/// Unlike [`Locale::from_str`], this never fails: environment-derived values
/// outside the supported set fall back to English.
pub fn resolve_locale(locale: &str) -> Locale {
    locale.parse().unwrap_or_else(|_| {
        tracing::debug!(locale = locale, "Unsupported environment locale, using default");
        Locale::DEFAULT
    })
}
