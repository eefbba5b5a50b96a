use super::{DecodedImage, UploadedImage};
use crate::ai::mime::{detect_image_format, gemini_mime_type};
use crate::{Error, Result};
use image::error::{ImageFormatHint, UnsupportedError, UnsupportedErrorKind};
use image::{ImageError, ImageFormat};
use std::io::Cursor;

/// Decode an upload on the blocking pool.
pub async fn decode_upload(upload: UploadedImage) -> Result<DecodedImage> {
    let file_name = upload.file_name;
    let bytes = upload.bytes;

    let decoded = tokio::task::spawn_blocking(move || decode_bytes(bytes))
        .await
        .map_err(|e| Error::Invariant(format!("Image decode task join error: {}", e)))??;

    tracing::debug!(
        file_name = %file_name,
        mime_type = decoded.mime_type,
        width = decoded.width,
        height = decoded.height,
        "Decoded uploaded image"
    );

    Ok(decoded)
}

/// Decode `bytes` fully, keeping them as-is when the model accepts the format
/// and re-encoding to PNG otherwise.
///
/// The format comes from the magic bytes; the upload's filename and declared
/// content type are not consulted.
pub fn decode_bytes(bytes: Vec<u8>) -> Result<DecodedImage> {
    let format = detect_image_format(&bytes).ok_or_else(|| {
        ImageError::Unsupported(UnsupportedError::from_format_and_kind(
            ImageFormatHint::Unknown,
            UnsupportedErrorKind::Format(ImageFormatHint::Unknown),
        ))
    })?;
    let img = image::load_from_memory_with_format(&bytes, format)?;
    let (width, height) = (img.width(), img.height());

    if let Some(mime_type) = gemini_mime_type(format) {
        return Ok(DecodedImage {
            bytes,
            mime_type,
            width,
            height,
        });
    }

    tracing::debug!(
        "Re-encoding {:?} upload as PNG for the model request",
        format
    );

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(DecodedImage {
        bytes: png,
        mime_type: "image/png",
        width,
        height,
    })
}
