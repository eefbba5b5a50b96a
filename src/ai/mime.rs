use image::ImageFormat;

/// MIME type Gemini accepts for inline image data, if the format is supported.
pub fn gemini_mime_type(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

/// Sniff the image format from magic bytes alone.
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    match image::guess_format(bytes) {
        Ok(format) => Some(format),
        Err(_) => {
            tracing::debug!(
                "Unrecognized image format (first 4 bytes: {:02X?})",
                &bytes[..bytes.len().min(4)]
            );
            None
        }
    }
}
