use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::error::{ChatError, Result};

pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Reads an image file into a `data:` URL suitable for a message's
/// `images` list.
pub fn load_image(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    let mime = mime_guess::from_path(path)
        .first_raw()
        .filter(|m| m.starts_with("image/"))
        .ok_or_else(|| ChatError::Image(format!("{} is not an image", path.display())))?;

    let size = fs::metadata(path)?.len();
    if size > MAX_IMAGE_BYTES {
        return Err(ChatError::Image(format!(
            "{} is {size} bytes; images are limited to 10 MiB",
            path.display()
        )));
    }

    let bytes = fs::read(path)?;
    tracing::debug!(path = %path.display(), mime, size, "Loaded image");

    Ok(to_data_url(mime, &bytes))
}

#[must_use]
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
