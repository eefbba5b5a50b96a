//! Error handling and custom error types
//!
//! `Error` is the crate-wide internal error. `AnalysisError` is the taxonomy a
//! request is reduced to before it reaches the client: every failure of the
//! analyze flow ends up as exactly one of its four kinds.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Request blocked by safety filters: {0}")]
    SafetyBlocked(String),

    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why an upload was rejected before any decoding happened.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("no file part named `image`")]
    NoImage,
    #[error("file part `image` has an empty filename")]
    NoSelectedFile,
    #[error("request body exceeds the upload limit")]
    TooLarge,
}

/// How the model signalled that it refused the image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefusalSignal {
    /// The call itself was rejected on policy grounds.
    #[error("blocked: {0}")]
    Blocked(String),
    /// The call succeeded but carried no content parts.
    #[error("empty response (finish reason: {})", .finish_reason.as_deref().unwrap_or("none"))]
    EmptyResponse { finish_reason: Option<String> },
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("validation failed: {0}")]
    Validation(UploadRejection),

    #[error("safety refusal: {0}")]
    SafetyRefusal(RefusalSignal),

    #[error("model service failure: {0}")]
    Service(#[source] Error),

    #[error("processing failure: {0}")]
    Processing(#[source] Error),
}

pub const MSG_NO_IMAGE: &str = "No image uploaded";
pub const MSG_NO_SELECTED_FILE: &str = "No selected file";
pub const MSG_TOO_LARGE: &str = "Image is too large";
pub const MSG_SAFETY_BLOCKED: &str =
    "SECURITY ALERT: This image violates safety guidelines (Violence/Nudity/Hate). Request blocked.";
pub const MSG_SAFETY_FLAGGED: &str = "SECURITY ALERT: The AI flagged this image as unsafe.";
pub const MSG_SERVICE_BUSY: &str = "The AI service is busy. Please try again in a moment.";
pub const MSG_PROCESSING: &str = "Could not read the vibe. Try a different photo.";

impl AnalysisError {
    /// Short machine-friendly name of the kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Validation(_) => "validation",
            AnalysisError::SafetyRefusal(_) => "safety_refusal",
            AnalysisError::Service(_) => "service",
            AnalysisError::Processing(_) => "processing",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            AnalysisError::Validation(_) | AnalysisError::SafetyRefusal(_) => 400,
            AnalysisError::Service(_) | AnalysisError::Processing(_) => 500,
        }
    }

    /// The sanitized message shown to the caller. Never includes the cause.
    pub fn client_message(&self) -> &'static str {
        match self {
            AnalysisError::Validation(UploadRejection::NoImage) => MSG_NO_IMAGE,
            AnalysisError::Validation(UploadRejection::NoSelectedFile) => MSG_NO_SELECTED_FILE,
            AnalysisError::Validation(UploadRejection::TooLarge) => MSG_TOO_LARGE,
            AnalysisError::SafetyRefusal(RefusalSignal::Blocked(_)) => MSG_SAFETY_BLOCKED,
            AnalysisError::SafetyRefusal(RefusalSignal::EmptyResponse { .. }) => {
                MSG_SAFETY_FLAGGED
            }
            AnalysisError::Service(_) => MSG_SERVICE_BUSY,
            AnalysisError::Processing(_) => MSG_PROCESSING,
        }
    }
}

impl From<UploadRejection> for AnalysisError {
    fn from(rejection: UploadRejection) -> Self {
        AnalysisError::Validation(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_per_kind() {
        assert_eq!(
            AnalysisError::Validation(UploadRejection::NoImage).http_status_code(),
            400
        );
        assert_eq!(
            AnalysisError::SafetyRefusal(RefusalSignal::EmptyResponse {
                finish_reason: None
            })
            .http_status_code(),
            400
        );
        assert_eq!(
            AnalysisError::Service(Error::AiProvider("down".to_string())).http_status_code(),
            500
        );
        assert_eq!(
            AnalysisError::Processing(Error::Invariant("bad".to_string())).http_status_code(),
            500
        );
    }

    #[test]
    fn test_client_messages_are_distinct() {
        let errors = [
            AnalysisError::Validation(UploadRejection::NoImage),
            AnalysisError::Validation(UploadRejection::NoSelectedFile),
            AnalysisError::Validation(UploadRejection::TooLarge),
            AnalysisError::SafetyRefusal(RefusalSignal::Blocked("SAFETY".to_string())),
            AnalysisError::SafetyRefusal(RefusalSignal::EmptyResponse {
                finish_reason: Some("SAFETY".to_string()),
            }),
            AnalysisError::Service(Error::AiProvider("quota".to_string())),
            AnalysisError::Processing(Error::Invariant("parse".to_string())),
        ];

        let mut messages: Vec<&str> = errors.iter().map(|e| e.client_message()).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), errors.len());
    }

    #[test]
    fn test_client_message_hides_cause() {
        let err = AnalysisError::Service(Error::AiProvider("secret upstream detail".to_string()));
        assert!(!err.client_message().contains("secret"));
        assert!(err.to_string().contains("secret upstream detail"));
    }
}
