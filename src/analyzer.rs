//! The analyze flow: decode, invoke, classify, normalize.

use crate::ai::{SafetyPolicy, VisionService};
use crate::error::{AnalysisError, RefusalSignal};
use crate::image::{decode_upload, UploadedImage};
use crate::{normalize, prompts, Error};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Runs one upload through the model. Holds no per-request state.
pub struct VibeAnalyzer {
    vision: Arc<dyn VisionService>,
    safety: SafetyPolicy,
    timeout: Duration,
}

impl VibeAnalyzer {
    pub fn new(vision: Arc<dyn VisionService>, safety: SafetyPolicy, timeout: Duration) -> Self {
        Self {
            vision,
            safety,
            timeout,
        }
    }

    pub fn safety(&self) -> &SafetyPolicy {
        &self.safety
    }

    /// Analyze an already-validated upload.
    ///
    /// Returns the parsed model JSON, or the analysis error kind that the
    /// caller should render.
    pub async fn analyze(&self, upload: UploadedImage) -> Result<Value, AnalysisError> {
        let image = decode_upload(upload)
            .await
            .map_err(AnalysisError::Processing)?;

        let invocation = self
            .vision
            .analyze_image(prompts::VIBE_ANALYSIS, &image, &self.safety);

        let output = match tokio::time::timeout(self.timeout, invocation).await {
            Ok(Ok(output)) => output,
            Ok(Err(Error::SafetyBlocked(reason))) => {
                return Err(AnalysisError::SafetyRefusal(RefusalSignal::Blocked(reason)))
            }
            Ok(Err(e)) => return Err(AnalysisError::Service(e)),
            Err(_) => return Err(AnalysisError::Service(Error::Timeout(self.timeout))),
        };

        if output.is_empty() {
            return Err(AnalysisError::SafetyRefusal(RefusalSignal::EmptyResponse {
                finish_reason: output.finish_reason,
            }));
        }

        normalize::parse_vibe(&output.text()).map_err(AnalysisError::Processing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::mock::MockOutcome;
    use crate::ai::MockVisionClient;
    use crate::error::UploadRejection;
    use image::ImageFormat;
    use std::io::Cursor;

    fn png_upload() -> UploadedImage {
        let img = image::RgbImage::from_pixel(2, 2, image::Rgb([10, 200, 90]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        UploadedImage {
            file_name: "beach.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes,
        }
    }

    fn analyzer(mock: &MockVisionClient) -> VibeAnalyzer {
        VibeAnalyzer::new(
            Arc::new(mock.clone()),
            SafetyPolicy::strict(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_fenced_json_is_returned_parsed() {
        let mock = MockVisionClient::new()
            .with_text_response("```json\n{\"vibe_title\": \"Green\", \"playlist\": []}\n```");

        let value = analyzer(&mock).analyze(png_upload()).await.unwrap();

        assert_eq!(value["vibe_title"], "Green");
    }

    #[tokio::test]
    async fn test_prompt_image_and_policy_reach_the_model() {
        let mock = MockVisionClient::new();
        let analyzer = VibeAnalyzer::new(
            Arc::new(mock.clone()),
            SafetyPolicy::relaxed(),
            Duration::from_secs(5),
        );

        analyzer.analyze(png_upload()).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, prompts::VIBE_ANALYSIS);
        assert_eq!(calls[0].mime_type, "image/png");
        assert_eq!(calls[0].safety, SafetyPolicy::relaxed());
    }

    #[tokio::test]
    async fn test_empty_parts_is_safety_refusal() {
        let mock = MockVisionClient::new().with_empty_response();

        let err = analyzer(&mock).analyze(png_upload()).await.unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::SafetyRefusal(RefusalSignal::EmptyResponse { .. })
        ));
        assert_eq!(err.http_status_code(), 400);
    }

    #[tokio::test]
    async fn test_policy_block_is_safety_refusal() {
        let mock = MockVisionClient::new().with_blocked_response("PROHIBITED_CONTENT");

        let err = analyzer(&mock).analyze(png_upload()).await.unwrap_err();

        assert!(matches!(
            err,
            AnalysisError::SafetyRefusal(RefusalSignal::Blocked(ref reason)) if reason == "PROHIBITED_CONTENT"
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_is_service_error() {
        let mock = MockVisionClient::new().with_failure("503 model overloaded");

        let err = analyzer(&mock).analyze(png_upload()).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Service(Error::AiProvider(_))));
        assert_eq!(err.http_status_code(), 500);
    }

    #[tokio::test]
    async fn test_slow_model_is_service_error() {
        let mock = MockVisionClient::new().with_outcome(MockOutcome::Delay(
            Duration::from_secs(5),
            Box::new(MockOutcome::Text("{}".to_string())),
        ));
        let analyzer = VibeAnalyzer::new(
            Arc::new(mock),
            SafetyPolicy::strict(),
            Duration::from_millis(20),
        );

        let err = analyzer.analyze(png_upload()).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Service(Error::Timeout(_))));
    }

    #[tokio::test]
    async fn test_unparseable_text_is_processing_error() {
        let mock = MockVisionClient::new().with_text_response("Sorry, I can't help with that.");

        let err = analyzer(&mock).analyze(png_upload()).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Processing(_)));
        assert_eq!(err.http_status_code(), 500);
    }

    #[tokio::test]
    async fn test_bad_image_is_processing_error_and_skips_model() {
        let mock = MockVisionClient::new();
        let upload = UploadedImage {
            file_name: "notes.txt".to_string(),
            content_type: Some("text/plain".to_string()),
            bytes: b"hello".to_vec(),
        };

        let err = analyzer(&mock).analyze(upload).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Processing(Error::Image(_))));
        assert_eq!(mock.get_call_count(), 0);
    }

    #[test]
    fn test_validation_errors_convert() {
        let err: AnalysisError = UploadRejection::NoSelectedFile.into();
        assert_eq!(err.client_message(), "No selected file");
    }
}
