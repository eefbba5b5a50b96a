//! Application wiring: configuration in, running HTTP server out.

use crate::ai::safety::SafetyPolicy;
use crate::ai::{GeminiVisionClient, VisionService};
use crate::analyzer::VibeAnalyzer;
use crate::models::Config;
use crate::server::{self, AppState};
use crate::Result;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Knobs the analyzer needs besides the model client.
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub safety: SafetyPolicy,
    pub model_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl AnalyzerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            safety: SafetyPolicy::new(config.safety_threshold),
            model_timeout: config.model_timeout,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Owns the analyzer and builds the HTTP router around it.
pub struct App {
    state: AppState,
    max_upload_bytes: usize,
}

impl App {
    /// Build an app from a concrete model client.
    ///
    /// This is primarily useful for integration tests that inject mocks.
    pub fn with_services(vision: Arc<dyn VisionService>, settings: AnalyzerSettings) -> Self {
        let analyzer = VibeAnalyzer::new(vision, settings.safety, settings.model_timeout);

        Self {
            state: AppState {
                analyzer: Arc::new(analyzer),
            },
            max_upload_bytes: settings.max_upload_bytes,
        }
    }

    /// Construct an app talking to Gemini, as described by `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let vision = GeminiVisionClient::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.model_timeout,
        )
        .with_base_url(config.gemini_base_url.clone());

        info!(
            "Vision provider: Gemini (model: {}, safety threshold: {})",
            vision.model(),
            config.safety_threshold
        );

        Ok(Self::with_services(
            Arc::new(vision),
            AnalyzerSettings::from_config(config),
        ))
    }

    pub fn router(&self) -> Router {
        server::router(self.state.clone(), self.max_upload_bytes)
    }

    /// Bind `addr` and serve until a shutdown signal arrives.
    pub async fn run(&self, addr: &str) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(
            addr = %listener.local_addr()?,
            max_upload_bytes = self.max_upload_bytes,
            "Server ready and accepting connections"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(server::shutdown_signal())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::safety::HarmBlockThreshold;

    fn config() -> Config {
        Config::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("key".to_string()),
            "SAFETY_THRESHOLD" => Some("relaxed".to_string()),
            "MAX_UPLOAD_BYTES" => Some("1024".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_settings_follow_config() {
        let settings = AnalyzerSettings::from_config(&config());

        assert_eq!(
            settings.safety.threshold(),
            HarmBlockThreshold::BlockOnlyHigh
        );
        assert_eq!(settings.max_upload_bytes, 1024);
        assert_eq!(settings.model_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_new_uses_configured_policy() {
        let app = App::new(&config()).unwrap();

        assert_eq!(
            app.state.analyzer.safety().threshold(),
            HarmBlockThreshold::BlockOnlyHigh
        );
        assert_eq!(app.max_upload_bytes, 1024);
    }
}
