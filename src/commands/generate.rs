//! `generate`: run a prompt through the generation pipeline.

use std::path::Path;

use crate::client::Context;
use crate::error::Result;
use crate::generation::{GenerationRequest, GenerationResult};
use crate::i18n::keys;

/// Generate an image and optionally save or open it.
pub async fn generate(
    ctx: &Context,
    prompt: &[String],
    download: Option<&Path>,
    open: bool,
) -> Result<()> {
    let pipeline = ctx.pipeline()?;

    // Runs alongside the generation; messages use whatever has settled.
    let _translation = ctx.start_translation();

    let request = GenerationRequest::new(prompt.join(" "), ctx.locale);
    ctx.output.info(&ctx.resolver.resolve_key(keys::GENERATING));

    let result = pipeline.submit(&request).await;

    ctx.output.value(&result, || match &result {
        GenerationResult::Success { image_url, .. } => vec![image_url.clone()],
        GenerationResult::Failure { .. } => Vec::new(),
    })?;

    let image_url = match &result {
        GenerationResult::Success { image_url, message } => {
            ctx.output.success(message);
            image_url.clone()
        },
        GenerationResult::Failure { .. } => return result.into_result().map(drop),
    };

    if let Some(dir) = download {
        let saved = pipeline.download(dir, &ctx.http).await?;
        ctx.output.success(&format!("{} {}", saved.message, saved.path.display()));
    }

    if open && let Err(e) = webbrowser::open(&image_url) {
        ctx.output.warn(&format!("Failed to open browser: {e}"));
    }

    Ok(())
}
