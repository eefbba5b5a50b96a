//! Multipart upload validation for `POST /analyze`.

use crate::error::UploadRejection;
use crate::image::UploadedImage;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;

/// Name of the multipart file field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Pull the `image` file part out of a multipart body.
///
/// A part named `image` without a `filename` is a plain form value rather
/// than a file and is skipped. A file part with an empty filename is what a
/// browser sends when no file was chosen.
pub async fn read_image_upload(
    mut multipart: Multipart,
) -> Result<UploadedImage, UploadRejection> {
    while let Some(field) = multipart.next_field().await.map_err(rejection_for)? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_string) else {
            tracing::debug!("Skipping `image` part without a filename");
            continue;
        };

        if file_name.is_empty() {
            return Err(UploadRejection::NoSelectedFile);
        }

        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(rejection_for)?;

        tracing::debug!(
            file_name = %file_name,
            content_type = ?content_type,
            size = bytes.len(),
            "Received image upload"
        );

        return Ok(UploadedImage {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(UploadRejection::NoImage)
}

fn rejection_for(err: MultipartError) -> UploadRejection {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Multipart body exceeded the upload limit: {}", err.body_text());
        UploadRejection::TooLarge
    } else {
        tracing::warn!("Malformed multipart body: {}", err.body_text());
        UploadRejection::NoImage
    }
}
