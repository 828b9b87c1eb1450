//! Static string tables, embedded as Fluent resources.
//!
//! Each supported locale ships a `.ftl` file compiled into the binary. At
//! catalog construction every message is formatted once through a
//! [`FluentBundle`] into a flat [`StringTable`], which is the shape the
//! translation service exchanges over the wire.

use std::collections::BTreeMap;
use std::sync::Arc;

use fluent_bundle::{FluentBundle, FluentResource};
use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use super::locales::{Locale, SUPPORTED_LOCALES};

/// Stable UI string keys.
pub mod keys {
    /// Page heading.
    pub const TITLE: &str = "title";
    /// Tagline under the heading.
    pub const SUBTITLE: &str = "subtitle";
    /// Prompt input placeholder.
    pub const PLACEHOLDER: &str = "placeholder";
    /// Generate action label.
    pub const GENERATE_BUTTON: &str = "generateButton";
    /// Shown while a generation is pending.
    pub const GENERATING: &str = "generating";
    /// Download action label.
    pub const DOWNLOAD_BUTTON: &str = "downloadButton";
    /// Empty prompt.
    pub const ERROR_PROMPT: &str = "errorPrompt";
    /// Generic generation failure.
    pub const ERROR_MESSAGE: &str = "errorMessage";
    /// Generation succeeded.
    pub const SUCCESS_MESSAGE: &str = "successMessage";
    /// Download succeeded.
    pub const DOWNLOAD_SUCCESS: &str = "downloadSuccess";
    /// Footer attribution.
    pub const POWERED_BY: &str = "poweredBy";
    /// Prompt over the length bound.
    pub const PROMPT_TOO_LONG: &str = "promptTooLong";
    /// Login required before generating.
    pub const AUTH_REQUIRED: &str = "authRequired";
    /// Free quota used up.
    pub const QUOTA_EXCEEDED: &str = "quotaExceeded";
    /// Generation service answered 429.
    pub const RATE_LIMITED: &str = "rateLimited";
    /// Generation service answered 402.
    pub const PAYMENT_REQUIRED: &str = "paymentRequired";
    /// A second submission while one is pending.
    pub const BUSY: &str = "busy";

    /// Every key the UI uses; the English table must define all of them.
    pub const ALL: &[&str] = &[
        TITLE,
        SUBTITLE,
        PLACEHOLDER,
        GENERATE_BUTTON,
        GENERATING,
        DOWNLOAD_BUTTON,
        ERROR_PROMPT,
        ERROR_MESSAGE,
        SUCCESS_MESSAGE,
        DOWNLOAD_SUCCESS,
        POWERED_BY,
        PROMPT_TOO_LONG,
        AUTH_REQUIRED,
        QUOTA_EXCEEDED,
        RATE_LIMITED,
        PAYMENT_REQUIRED,
        BUSY,
    ];
}

/// Key → string mapping for one locale.
///
/// Serializes as a flat JSON object. A table lacking some keys is partial,
/// not invalid; lookups fall through to the next table in the chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringTable(BTreeMap<String, String>);

impl StringTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Insert or replace a string.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StringTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

const LOCALE_COUNT: usize = 10;

/// The embedded static tables for every supported locale.
#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    tables: [Arc<StringTable>; LOCALE_COUNT],
}

impl LocaleCatalog {
    /// Build the catalog from the embedded `.ftl` resources.
    pub fn embedded() -> Self {
        let tables = std::array::from_fn(|i| Arc::new(load_table(SUPPORTED_LOCALES[i])));
        Self { tables }
    }

    /// Static table for a locale. Total over [`Locale`].
    pub fn lookup(&self, locale: Locale) -> Arc<StringTable> {
        Arc::clone(&self.tables[locale as usize])
    }

    /// The canonical English table.
    pub fn default_table(&self) -> Arc<StringTable> {
        self.lookup(Locale::DEFAULT)
    }

    /// Replace one locale's table.
    pub(crate) fn with_table(mut self, locale: Locale, table: StringTable) -> Self {
        self.tables[locale as usize] = Arc::new(table);
        self
    }
}

impl Default for LocaleCatalog {
    fn default() -> Self {
        Self::embedded()
    }
}

fn ftl_source(locale: Locale) -> &'static str {
    match locale {
        Locale::En => include_str!("locales/en.ftl"),
        Locale::Es => include_str!("locales/es.ftl"),
        Locale::Fr => include_str!("locales/fr.ftl"),
        Locale::De => include_str!("locales/de.ftl"),
        Locale::Ja => include_str!("locales/ja.ftl"),
        Locale::Zh => include_str!("locales/zh.ftl"),
        Locale::Ar => include_str!("locales/ar.ftl"),
        Locale::Hi => include_str!("locales/hi.ftl"),
        Locale::Pt => include_str!("locales/pt.ftl"),
        Locale::Ru => include_str!("locales/ru.ftl"),
    }
}

/// Format every known key of a locale's resource into a flat table.
fn load_table(locale: Locale) -> StringTable {
    let langid: LanguageIdentifier = locale.code().parse().unwrap_or_default();

    let resource = FluentResource::try_new(ftl_source(locale).to_string()).unwrap_or_else(
        |(partial, errors)| {
            tracing::error!(locale = %locale, errors = ?errors, "Malformed embedded FTL resource");
            partial
        },
    );

    let mut bundle: FluentBundle<FluentResource> = FluentBundle::new(vec![langid]);
    bundle.set_use_isolating(false);
    if let Err(errors) = bundle.add_resource(resource) {
        tracing::warn!(locale = %locale, errors = ?errors, "Duplicate FTL messages");
    }

    let mut table = StringTable::new();
    for key in keys::ALL {
        let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) else {
            continue;
        };

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, None, &mut errors);
        if !errors.is_empty() {
            tracing::warn!(locale = %locale, key = key, errors = ?errors, "Translation errors");
        }
        table.insert(*key, value.into_owned());
    }

    table
}
