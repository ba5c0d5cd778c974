use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use tokio::fs;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

const IMAGE_DIR: &str = "recipes/images";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}

/// Decodes a base64 image, either as a `data:image/...;base64,` URI or as a
/// bare base64 string whose format is sniffed from its leading bytes.
pub fn decode_image(input: &str) -> AppResult<DecodedImage> {
    let input = input.trim();
    let (declared, encoded) = match input.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest
                .split_once(',')
                .ok_or_else(|| AppError::validation("Malformed image data URI."))?;
            let mime = header
                .strip_suffix(";base64")
                .ok_or_else(|| AppError::validation("Image must be base64 encoded."))?;
            let subtype = mime
                .strip_prefix("image/")
                .ok_or_else(|| AppError::validation("Uploaded file is not an image."))?;
            (Some(extension_for(subtype)?), data)
        }
        None => (None, input),
    };

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AppError::validation("Image is not valid base64."))?;
    if bytes.is_empty() {
        return Err(AppError::validation("Image is empty."));
    }

    let extension = match declared {
        Some(ext) => ext,
        None => sniff_extension(&bytes)
            .ok_or_else(|| AppError::validation("Uploaded file is not an image."))?,
    };

    Ok(DecodedImage { bytes, extension })
}

fn extension_for(subtype: &str) -> AppResult<&'static str> {
    match subtype.to_ascii_lowercase().as_str() {
        "png" => Ok("png"),
        "jpeg" | "jpg" | "pjpeg" => Ok("jpg"),
        "gif" => Ok("gif"),
        "webp" => Ok("webp"),
        "bmp" => Ok("bmp"),
        other => Err(AppError::validation(format!(
            "Unsupported image type: {other}."
        ))),
    }
}

fn sniff_extension(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpg")
    } else if bytes.starts_with(b"GIF8") {
        Some("gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("webp")
    } else if bytes.starts_with(b"BM") {
        Some("bmp")
    } else {
        None
    }
}

/// Writes the image under `media_root` and returns its path relative to it.
pub async fn save_image(media_root: &str, image: &DecodedImage) -> AppResult<String> {
    let relative = format!("{IMAGE_DIR}/{}.{}", Uuid::new_v4(), image.extension);
    let target = Path::new(media_root).join(&relative);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
    }
    fs::write(&target, &image.bytes)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(relative)
}

/// Best-effort removal of a stored image.
pub async fn remove_image(media_root: &str, relative: &str) {
    let target = Path::new(media_root).join(relative);
    if let Err(err) = fs::remove_file(&target).await {
        tracing::warn!(error = %err, path = %target.display(), "failed to remove image");
    }
}
