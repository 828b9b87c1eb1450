//! `strings` and `locales`: inspect the localized UI strings.

use std::time::Duration;

use serde::Serialize;

use crate::client::Context;
use crate::error::{Error, Result};
use crate::i18n::{Locale, SUPPORTED_LOCALES, TableSource, keys};
use crate::output::Displayable;

/// One resolved UI string.
#[derive(Debug, Clone, Serialize)]
pub struct StringRow {
    /// String key.
    pub key: &'static str,
    /// Resolved value.
    pub value: String,
    /// Tier the value came from.
    pub source: Option<TableSource>,
}

impl Displayable for StringRow {
    fn table_row(&self) -> Vec<String> {
        let source = match self.source {
            Some(TableSource::Remote) => "remote",
            Some(TableSource::StaticLocale) => "static",
            Some(TableSource::StaticDefault) => "default",
            None => "missing",
        };
        vec![self.key.to_string(), source.to_string(), self.value.clone()]
    }

    fn table_headers() -> Vec<&'static str> {
        vec!["KEY", "SOURCE", "VALUE"]
    }
}

/// Show resolved strings for the selected locale.
pub async fn strings(ctx: &Context, key: Option<&str>, wait: u64) -> Result<()> {
    let selected: Vec<&'static str> = match key {
        Some(k) => {
            let known = keys::ALL.iter().copied().find(|candidate| *candidate == k);
            vec![known.ok_or_else(|| Error::invalid_arg(format!("Unknown string key '{k}'")))?]
        },
        None => keys::ALL.to_vec(),
    };

    if let Some(task) = ctx.start_translation() {
        match tokio::time::timeout(Duration::from_secs(wait), task).await {
            Ok(Ok(())) => {},
            Ok(Err(e)) => tracing::warn!(error = %e, "Translation task failed"),
            Err(_) => ctx.output.warn("Translation still pending, showing static strings"),
        }
    }

    let translator = ctx.resolver.translator();
    ctx.output.info(&format!(
        "Locale: {} ({}), translation: {}",
        translator.locale().display_name(),
        translator.locale().code(),
        ctx.resolver.state().label()
    ));

    let rows: Vec<StringRow> = selected
        .into_iter()
        .map(|key| StringRow {
            key,
            value: translator.get(key),
            source: translator.source_of(key),
        })
        .collect();

    ctx.output.table(&rows)
}

/// A supported locale.
#[derive(Debug, Clone, Serialize)]
pub struct LocaleRow {
    /// Locale code.
    pub code: &'static str,
    /// Native name.
    pub name: &'static str,
    /// Whether this is the locale in use.
    pub selected: bool,
}

impl Displayable for LocaleRow {
    fn table_row(&self) -> Vec<String> {
        let marker = if self.selected { "*" } else { "" };
        vec![marker.to_string(), self.code.to_string(), self.name.to_string()]
    }

    fn table_headers() -> Vec<&'static str> {
        vec!["", "CODE", "NAME"]
    }
}

/// List supported locales.
pub async fn locales(ctx: &Context) -> Result<()> {
    ctx.output.table(&locale_rows(ctx.locale))
}

fn locale_rows(current: Locale) -> Vec<LocaleRow> {
    SUPPORTED_LOCALES
        .iter()
        .map(|&locale| LocaleRow {
            code: locale.code(),
            name: locale.display_name(),
            selected: locale == current,
        })
        .collect()
}
