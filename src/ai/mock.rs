use super::{ModelOutput, SafetyPolicy, VisionService};
use crate::image::DecodedImage;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted outcome for one mock invocation.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Text(String),
    Empty { finish_reason: Option<String> },
    Blocked(String),
    Failure(String),
    Delay(Duration, Box<MockOutcome>),
}

/// Details of a call the mock received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub mime_type: String,
    pub image_len: usize,
    pub safety: SafetyPolicy,
}

/// Clones share the same script and call log.
#[derive(Clone)]
pub struct MockVisionClient {
    outcomes: Arc<Mutex<Vec<MockOutcome>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockVisionClient {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_outcome(self, outcome: MockOutcome) -> Self {
        self.outcomes.lock().unwrap().push(outcome);
        self
    }

    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.with_outcome(MockOutcome::Text(text.into()))
    }

    pub fn with_empty_response(self) -> Self {
        self.with_outcome(MockOutcome::Empty {
            finish_reason: Some("SAFETY".to_string()),
        })
    }

    pub fn with_blocked_response(self, reason: impl Into<String>) -> Self {
        self.with_outcome(MockOutcome::Blocked(reason.into()))
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.with_outcome(MockOutcome::Failure(message.into()))
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn resolve(outcome: MockOutcome) -> Result<ModelOutput> {
        let mut outcome = outcome;
        loop {
            match outcome {
                MockOutcome::Text(text) => return Ok(ModelOutput::from_text(text)),
                MockOutcome::Empty { finish_reason } => {
                    return Ok(ModelOutput {
                        parts: Vec::new(),
                        finish_reason,
                    })
                }
                MockOutcome::Blocked(reason) => return Err(Error::SafetyBlocked(reason)),
                MockOutcome::Failure(message) => return Err(Error::AiProvider(message)),
                MockOutcome::Delay(delay, next) => {
                    tokio::time::sleep(delay).await;
                    outcome = *next;
                }
            }
        }
    }
}

fn default_vibe_json() -> String {
    let playlist: Vec<serde_json::Value> = (1..=5)
        .map(|i| serde_json::json!({ "title": format!("Song {}", i), "artist": "Artist" }))
        .collect();

    serde_json::json!({
        "vibe_title": "Mock Vibe",
        "vibe_description": "A mock description.",
        "playlist": playlist
    })
    .to_string()
}

impl Default for MockVisionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionService for MockVisionClient {
    async fn analyze_image(
        &self,
        prompt: &str,
        image: &DecodedImage,
        safety: &SafetyPolicy,
    ) -> Result<ModelOutput> {
        let outcome = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                mime_type: image.mime_type.to_string(),
                image_len: image.bytes.len(),
                safety: *safety,
            });

            let outcomes = self.outcomes.lock().unwrap();
            if outcomes.is_empty() {
                // Default mock response
                MockOutcome::Text(default_vibe_json())
            } else {
                let index = (calls.len() - 1) % outcomes.len();
                outcomes[index].clone()
            }
        };

        Self::resolve(outcome).await
    }
}
