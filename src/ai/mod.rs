//! AI service integration for image analysis
//!
//! Provides the `VisionService` seam used by the analyzer, a Gemini
//! implementation, and a scriptable mock for tests.

pub mod gemini;
pub mod mime;
pub mod mock;
pub mod safety;

pub use gemini::GeminiVisionClient;
pub use mock::MockVisionClient;
pub use safety::SafetyPolicy;

use crate::image::DecodedImage;
use crate::Result;
use async_trait::async_trait;

/// What a model returned for one successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelOutput {
    /// Text parts of the first candidate, in order. Empty means the model
    /// produced nothing, which Gemini does when its safety filters trip.
    pub parts: Vec<String>,
    pub finish_reason: Option<String>,
}

impl ModelOutput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![text.into()],
            finish_reason: Some("STOP".to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// All text parts joined together.
    pub fn text(&self) -> String {
        self.parts.concat()
    }
}

#[async_trait]
pub trait VisionService: Send + Sync {
    /// Send `prompt` followed by `image` to the model under `safety`.
    ///
    /// Returns `Error::SafetyBlocked` when the request itself was rejected on
    /// policy grounds; any other error is a transport or provider failure.
    async fn analyze_image(
        &self,
        prompt: &str,
        image: &DecodedImage,
        safety: &SafetyPolicy,
    ) -> Result<ModelOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_output_text_concatenates_parts() {
        let output = ModelOutput {
            parts: vec!["{\"a\":".to_string(), " 1}".to_string()],
            finish_reason: None,
        };
        assert_eq!(output.text(), "{\"a\": 1}");
        assert!(!output.is_empty());
    }

    #[test]
    fn test_default_model_output_is_empty() {
        assert!(ModelOutput::default().is_empty());
    }
}
