use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part};
use crate::ai::{ModelOutput, SafetyPolicy, VisionService};
use crate::image::DecodedImage;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub struct GeminiVisionClient {
    http: GeminiHttpClient,
}

impl GeminiVisionClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, timeout, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }

    fn build_request(
        prompt: &str,
        image: &DecodedImage,
        safety: &SafetyPolicy,
    ) -> GenerateContentRequest {
        use base64::Engine as _;
        let data = base64::engine::general_purpose::STANDARD.encode(&image.bytes);

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.to_string(),
                            data,
                        },
                    },
                ],
            }],
            safety_settings: safety.settings(),
        }
    }

    fn into_output(response: GenerateContentResponse) -> Result<ModelOutput> {
        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            tracing::warn!("Gemini blocked the request: {}", reason);
            return Err(Error::SafetyBlocked(reason));
        }

        let Some(candidate) = response.candidates.into_iter().next() else {
            return Ok(ModelOutput::default());
        };

        let parts = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| match p {
                        Part::Text { text } => Some(text),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(ModelOutput {
            parts,
            finish_reason: candidate.finish_reason,
        })
    }
}

#[async_trait]
impl VisionService for GeminiVisionClient {
    async fn analyze_image(
        &self,
        prompt: &str,
        image: &DecodedImage,
        safety: &SafetyPolicy,
    ) -> Result<ModelOutput> {
        tracing::debug!(
            "Analyzing image ({} bytes, {}) via Gemini model {} at {}",
            image.bytes.len(),
            image.mime_type,
            self.http.model(),
            safety.threshold()
        );

        let request = Self::build_request(prompt, image, safety);
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let output = Self::into_output(response)?;

        tracing::debug!(
            "Gemini returned {} text part(s), finish reason {:?}",
            output.parts.len(),
            output.finish_reason
        );

        Ok(output)
    }
}
