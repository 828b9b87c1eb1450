//! Saving a generated image to disk.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};

/// An image written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct SavedImage {
    /// Where the image was written.
    pub path: PathBuf,
    /// Translated confirmation.
    pub message: String,
}

/// File name for an image saved at `now`.
pub fn file_name(now: DateTime<Utc>) -> String {
    format!("generated-image-{}.png", now.timestamp_millis())
}

/// Write the image behind `image_url` into `dir`.
pub async fn save_image(
    http: &reqwest::Client,
    image_url: &str,
    dir: &Path,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let bytes = match decode_data_url(image_url) {
        Some(decoded) => decoded?,
        None => fetch(http, image_url).await?,
    };

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name(now));
    tokio::fs::write(&path, &bytes).await?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Image saved");
    Ok(path)
}

async fn fetch(http: &reqwest::Client, image_url: &str) -> Result<Vec<u8>> {
    let url = url::Url::parse(image_url)
        .map_err(|e| Error::other(format!("Invalid image URL '{image_url}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::other(format!("Unsupported image URL scheme '{}'", url.scheme())));
    }

    let response = http.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Decode a base64 `data:` URL. `None` when `url` is not a data URL.
fn decode_data_url(url: &str) -> Option<Result<Vec<u8>>> {
    let rest = url.strip_prefix("data:")?;

    let decoded = match rest.split_once(',') {
        Some((meta, payload)) if meta.ends_with(";base64") => STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::other(format!("Invalid base64 image data: {e}"))),
        Some(_) => Err(Error::other("Only base64 data URLs are supported")),
        None => Err(Error::other("Malformed data URL")),
    };
    Some(decoded)
}
