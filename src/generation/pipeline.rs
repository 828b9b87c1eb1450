//! Prompt validation, gating, remote generation and result projection.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use super::download::{self, SavedImage};
use super::gate::{Authorization, DenialReason, GenerationGate};
use crate::client::{GenerateError, ImageGenerator};
use crate::error::{Error, Result};
use crate::i18n::{keys, Locale, TranslationResolver};
use crate::session::Session;

/// Longest accepted prompt, in characters.
pub const MAX_PROMPT_CHARS: usize = 400;

/// A prompt submitted in a locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Raw prompt text; trimmed before use.
    pub prompt: String,
    /// Locale the prompt was composed in.
    pub locale: Locale,
}

impl GenerationRequest {
    /// Create a request.
    pub fn new(prompt: impl Into<String>, locale: Locale) -> Self {
        Self { prompt: prompt.into(), locale }
    }
}

/// Where the user should be sent after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Surface {
    /// Account registration.
    Register,
}

/// Why a generation request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    /// No auth token.
    AuthRequired,
    /// Free generations used up.
    QuotaExceeded,
    /// Prompt empty after trimming.
    EmptyPrompt,
    /// Prompt longer than [`MAX_PROMPT_CHARS`].
    PromptTooLong,
    /// Service failed or answered without an image.
    GenerationFailed,
    /// Service answered 429.
    RateLimited,
    /// Service answered 402.
    PaymentRequired,
    /// Another request is still pending.
    Busy,
}

impl FailureReason {
    /// UI string key for the default message.
    pub fn message_key(self) -> &'static str {
        match self {
            FailureReason::AuthRequired => keys::AUTH_REQUIRED,
            FailureReason::QuotaExceeded => keys::QUOTA_EXCEEDED,
            FailureReason::EmptyPrompt => keys::ERROR_PROMPT,
            FailureReason::PromptTooLong => keys::PROMPT_TOO_LONG,
            FailureReason::GenerationFailed => keys::ERROR_MESSAGE,
            FailureReason::RateLimited => keys::RATE_LIMITED,
            FailureReason::PaymentRequired => keys::PAYMENT_REQUIRED,
            FailureReason::Busy => keys::BUSY,
        }
    }

    /// Navigation side effect of this failure, if any.
    pub fn redirect(self) -> Option<Surface> {
        match self {
            FailureReason::AuthRequired => Some(Surface::Register),
            _ => None,
        }
    }
}

impl From<DenialReason> for FailureReason {
    fn from(reason: DenialReason) -> Self {
        match reason {
            DenialReason::AuthRequired => FailureReason::AuthRequired,
            DenialReason::QuotaExceeded => FailureReason::QuotaExceeded,
        }
    }
}

/// Terminal outcome of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum GenerationResult {
    /// The service produced an image.
    Success {
        /// Image location (`http(s)` or `data:` URL).
        image_url: String,
        /// Translated success notice.
        message: String,
    },
    /// The request did not produce an image.
    Failure {
        /// Failure category.
        reason: FailureReason,
        /// User-facing message.
        message: String,
    },
}

impl GenerationResult {
    /// Whether this is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }

    /// Convert into a `Result`, mapping failures to [`Error::Generation`].
    pub fn into_result(self) -> Result<String> {
        match self {
            GenerationResult::Success { image_url, .. } => Ok(image_url),
            GenerationResult::Failure { reason, message } => {
                Err(Error::Generation { reason, message })
            },
        }
    }
}

/// Clears the in-flight flag on drop.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).ok()?;
        Some(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Orchestrates a generation request end to end.
pub struct GenerationPipeline {
    session: Session,
    gate: GenerationGate,
    generator: Arc<dyn ImageGenerator>,
    resolver: TranslationResolver,
    in_flight: AtomicBool,
    last: Mutex<Option<GenerationResult>>,
}

impl GenerationPipeline {
    /// Assemble a pipeline.
    pub fn new(
        session: Session,
        gate: GenerationGate,
        generator: Arc<dyn ImageGenerator>,
        resolver: TranslationResolver,
    ) -> Self {
        Self {
            session,
            gate,
            generator,
            resolver,
            in_flight: AtomicBool::new(false),
            last: Mutex::new(None),
        }
    }

    /// Whether a submission is pending.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The most recent terminal result.
    pub fn last_result(&self) -> Option<GenerationResult> {
        self.last.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Submit a prompt.
    ///
    /// Never retries. Denied, invalid and concurrent submissions return
    /// without contacting the service. The counter moves only on success.
    pub async fn submit(&self, request: &GenerationRequest) -> GenerationResult {
        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!("Submission rejected, another request is pending");
            return self.failure(FailureReason::Busy, None);
        };

        let result = self.run(request).await;
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(result.clone());
        result
    }

    async fn run(&self, request: &GenerationRequest) -> GenerationResult {
        let prompt = request.prompt.trim();
        if prompt.is_empty() {
            return self.failure(FailureReason::EmptyPrompt, None);
        }
        if prompt.chars().count() > MAX_PROMPT_CHARS {
            return self.failure(FailureReason::PromptTooLong, None);
        }

        let token = self.session.auth_token();
        let used = self.session.quota().read();
        if let Authorization::Denied(reason) = self.gate.authorize(token.as_ref(), used) {
            tracing::info!(?reason, used, limit = self.gate.limit(), "Generation denied");
            return self.failure(reason.into(), None);
        }

        tracing::info!(locale = %request.locale, chars = prompt.chars().count(), "Generating image");

        match self.generator.generate(prompt).await {
            Ok(image_url) => {
                match self.session.quota().increment() {
                    Ok(count) => tracing::debug!(count, "Generation recorded"),
                    Err(e) => tracing::error!(error = %e, "Could not persist generation count"),
                }
                GenerationResult::Success {
                    image_url,
                    message: self.resolver.resolve_key(keys::SUCCESS_MESSAGE),
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Image generation failed");
                let reason = match &e {
                    GenerateError::RateLimited { .. } => FailureReason::RateLimited,
                    GenerateError::PaymentRequired { .. } => FailureReason::PaymentRequired,
                    _ => FailureReason::GenerationFailed,
                };
                let service_message = match reason {
                    FailureReason::GenerationFailed => e.service_message().map(str::to_string),
                    _ => None,
                };
                self.failure(reason, service_message)
            },
        }
    }

    fn failure(&self, reason: FailureReason, service_message: Option<String>) -> GenerationResult {
        let message =
            service_message.unwrap_or_else(|| self.resolver.resolve_key(reason.message_key()));
        GenerationResult::Failure { reason, message }
    }

    /// Save the last successful image under `dir`.
    ///
    /// Fails with [`Error::NothingToDownload`] unless the last result is a
    /// success.
    pub async fn download(&self, dir: &Path, http: &reqwest::Client) -> Result<SavedImage> {
        let Some(GenerationResult::Success { image_url, .. }) = self.last_result() else {
            return Err(Error::NothingToDownload);
        };

        let path = download::save_image(http, &image_url, dir, chrono::Utc::now()).await?;
        Ok(SavedImage { path, message: self.resolver.resolve_key(keys::DOWNLOAD_SUCCESS) })
    }
}

impl std::fmt::Debug for GenerationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationPipeline")
            .field("gate", &self.gate)
            .field("busy", &self.is_busy())
            .finish()
    }
}
