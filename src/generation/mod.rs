//! Image generation: the free-use gate, the persisted counter and the
//! request pipeline.
//!
//! A submission flows through [`GenerationPipeline::submit`]: the prompt is
//! validated, the [`GenerationGate`] checks the session, the generation
//! service is called once, and the [`QuotaStore`] is bumped only when an image
//! comes back.

mod download;
mod gate;
mod pipeline;
mod quota;

pub use download::{SavedImage, file_name};
pub use gate::{Authorization, DenialReason, FREE_LIMIT, GenerationGate};
pub use pipeline::{
    FailureReason, GenerationPipeline, GenerationRequest, GenerationResult, MAX_PROMPT_CHARS,
    Surface,
};
pub use quota::QuotaStore;
