//! Translation service client.
//!
//! The service receives the canonical English table and answers with the
//! same keys translated into the target locale.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::apply_api_key;
use crate::i18n::{Locale, StringTable};

/// Why a remote translation could not be used.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Request never produced a response.
    #[error("translation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx answer; the body is kept for logging only.
    #[error("translation service returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// 2xx answer whose body is not a string table.
    #[error("malformed translation payload: {0}")]
    Malformed(String),

    /// No translation endpoint configured.
    #[error("no translation endpoint configured")]
    Unconfigured,
}

/// Remote translation of a whole string table.
#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Translate `content` (English) into `target`.
    async fn translate(
        &self,
        content: &StringTable,
        target: Locale,
    ) -> Result<StringTable, TranslateError>;
}

/// Service used when no endpoint is configured; every request fails, so
/// lookups resolve from the static tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTranslationService;

#[async_trait]
impl TranslationService for OfflineTranslationService {
    async fn translate(
        &self,
        _content: &StringTable,
        _target: Locale,
    ) -> Result<StringTable, TranslateError> {
        Err(TranslateError::Unconfigured)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    content: &'a StringTable,
    source_locale: &'static str,
    target_locale: &'static str,
}

/// HTTP-backed translation service.
#[derive(Debug, Clone)]
pub struct HttpTranslationService {
    http: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpTranslationService {
    /// Create a client posting to `endpoint`.
    pub fn new(http: Client, endpoint: Url, api_key: Option<String>) -> Self {
        Self { http, endpoint, api_key }
    }
}

#[async_trait]
impl TranslationService for HttpTranslationService {
    async fn translate(
        &self,
        content: &StringTable,
        target: Locale,
    ) -> Result<StringTable, TranslateError> {
        let body = TranslateRequest {
            content,
            source_locale: Locale::DEFAULT.code(),
            target_locale: target.code(),
        };

        tracing::debug!(endpoint = %self.endpoint, locale = %target, "Requesting translation");

        let request = self.http.post(self.endpoint.clone()).json(&body);
        let response = apply_api_key(request, self.api_key.as_deref()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Status { status: status.as_u16(), body });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| TranslateError::Malformed(e.to_string()))?;
        parse_translated(payload, content)
    }
}

/// Accepts `{"translated": {...}}` or a bare string map.
///
/// Only string values for keys present in `content` are kept; lookups for
/// dropped keys fall back to the static tables. A payload with no such entry
/// is malformed.
pub fn parse_translated(payload: Value, content: &StringTable) -> Result<StringTable, TranslateError> {
    let map = match payload {
        Value::Object(mut object) => match object.remove("translated") {
            Some(Value::Object(inner)) => inner,
            Some(other) => {
                return Err(TranslateError::Malformed(format!(
                    "'translated' is not an object: {other}"
                )));
            },
            None => object,
        },
        other => {
            return Err(TranslateError::Malformed(format!("expected a JSON object, got {other}")));
        },
    };

    let table: StringTable = map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) if content.contains_key(&key) => Some((key, s)),
            _ => None,
        })
        .collect();

    if table.is_empty() {
        return Err(TranslateError::Malformed("no translated strings".to_string()));
    }

    Ok(table)
}
