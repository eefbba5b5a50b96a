//! Data models and structures
//!
//! Defines the vibe payload returned to callers and the process configuration
//! read from the environment.

use crate::ai::safety::HarmBlockThreshold;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of songs the prompt asks the model for.
pub const PLAYLIST_LEN: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub title: String,
    pub artist: String,
}

/// The shape the model is asked to produce.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VibeResult {
    pub vibe_title: String,
    pub vibe_description: String,
    pub playlist: Vec<Song>,
}

impl VibeResult {
    /// Describes every way this result departs from the requested shape.
    pub fn shape_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.playlist.len() != PLAYLIST_LEN {
            warnings.push(format!(
                "playlist has {} entries, expected {}",
                self.playlist.len(),
                PLAYLIST_LEN
            ));
        }

        let title_words = self.vibe_title.split_whitespace().count();
        if title_words > 5 {
            warnings.push(format!("vibe_title has {} words, expected at most 5", title_words));
        }

        warnings
    }
}

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-flash-latest";
pub use crate::ai::gemini::client::DEFAULT_BASE_URL as DEFAULT_GEMINI_BASE_URL;
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub safety_threshold: HarmBlockThreshold,
    pub model_timeout: Duration,
    pub max_upload_bytes: usize,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let gemini_api_key = non_empty("GEMINI_API_KEY")
            .ok_or_else(|| Error::Config("GEMINI_API_KEY not set".to_string()))?;

        let safety_threshold = match non_empty("SAFETY_THRESHOLD") {
            Some(value) => value.parse()?,
            None => HarmBlockThreshold::BlockLowAndAbove,
        };

        let model_timeout_secs = parse_or(
            "MODEL_TIMEOUT_SECS",
            non_empty("MODEL_TIMEOUT_SECS"),
            DEFAULT_MODEL_TIMEOUT_SECS,
        )?;
        if model_timeout_secs == 0 {
            return Err(Error::Config(
                "MODEL_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            gemini_api_key,
            gemini_model: non_empty("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: non_empty("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            safety_threshold,
            model_timeout: Duration::from_secs(model_timeout_secs),
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                non_empty("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or("PORT", non_empty("PORT"), DEFAULT_PORT)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} has an invalid value: '{}'", key, raw))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "key")])).unwrap();

        assert_eq!(config.gemini_api_key, "key");
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.safety_threshold, HarmBlockThreshold::BlockLowAndAbove);
        assert_eq!(config.model_timeout, Duration::from_secs(30));
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_config_requires_api_key() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_relaxed_threshold() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "key"),
            ("SAFETY_THRESHOLD", "relaxed"),
            ("GEMINI_MODEL", "models/gemini-2.5-flash"),
        ]))
        .unwrap();

        assert_eq!(config.safety_threshold, HarmBlockThreshold::BlockOnlyHigh);
        assert_eq!(config.gemini_model, "models/gemini-2.5-flash");
    }

    #[test]
    fn test_config_rejects_bad_numbers() {
        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "key"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "key"),
            ("MODEL_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_vibe_result_shape_warnings() {
        let mut vibe = VibeResult {
            vibe_title: "Sunny Calm".to_string(),
            vibe_description: "A bright, relaxed afternoon.".to_string(),
            playlist: (0..5)
                .map(|i| Song {
                    title: format!("Song {}", i),
                    artist: "Artist".to_string(),
                })
                .collect(),
        };
        assert!(vibe.shape_warnings().is_empty());

        vibe.playlist.pop();
        vibe.vibe_title = "A very long title with many words".to_string();
        assert_eq!(vibe.shape_warnings().len(), 2);
    }
}
