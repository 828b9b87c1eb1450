//! Image generation service client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::apply_api_key;

/// Why the generation service did not produce an image.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// HTTP 429.
    #[error("{}", .message.as_deref().unwrap_or("rate limited"))]
    RateLimited {
        /// Service-provided message.
        message: Option<String>,
    },

    /// HTTP 402.
    #[error("{}", .message.as_deref().unwrap_or("payment required"))]
    PaymentRequired {
        /// Service-provided message.
        message: Option<String>,
    },

    /// Any other non-2xx answer.
    #[error("generation service returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Service-provided message.
        message: Option<String>,
    },

    /// 2xx answer without a usable `imageUrl`.
    #[error("{}", .message.as_deref().unwrap_or("no image received"))]
    MissingImage {
        /// Service-provided message.
        message: Option<String>,
    },

    /// Request never produced a response.
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl GenerateError {
    /// Message supplied by the service, if it sent one.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            GenerateError::RateLimited { message }
            | GenerateError::PaymentRequired { message }
            | GenerateError::Status { message, .. }
            | GenerateError::MissingImage { message } => message.as_deref(),
            GenerateError::Transport(_) => None,
        }
    }
}

/// Remote image generation.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate an image for `prompt` and return its URL.
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP-backed image generator.
#[derive(Debug, Clone)]
pub struct HttpImageGenerator {
    http: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpImageGenerator {
    /// Create a client posting to `endpoint`.
    pub fn new(http: Client, endpoint: Url, api_key: Option<String>) -> Self {
        Self { http, endpoint, api_key }
    }
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        tracing::debug!(endpoint = %self.endpoint, "Requesting image generation");

        let request = self.http.post(self.endpoint.clone()).json(&GenerateRequest { prompt });
        let response = apply_api_key(request, self.api_key.as_deref()).send().await?;

        let status = response.status();
        let text = response.text().await?;
        let body: GenerateResponse = serde_json::from_str(&text).unwrap_or_default();

        interpret(status, body)
    }
}

fn interpret(status: StatusCode, body: GenerateResponse) -> Result<String, GenerateError> {
    let message = body.error.filter(|m| !m.trim().is_empty());

    match status {
        StatusCode::TOO_MANY_REQUESTS => Err(GenerateError::RateLimited { message }),
        StatusCode::PAYMENT_REQUIRED => Err(GenerateError::PaymentRequired { message }),
        s if !s.is_success() => {
            tracing::warn!(status = s.as_u16(), "Generation service error");
            Err(GenerateError::Status { status: s.as_u16(), message })
        },
        _ => body
            .image_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(GenerateError::MissingImage { message }),
    }
}
