//! Vibe analyzer - turns an uploaded photo into a mood and a five-song playlist
//!
//! The service accepts an image over HTTP, asks a Gemini multimodal model to
//! describe its vibe as JSON, and relays the normalized result (or a stable
//! error message) back to the caller.

pub mod ai;
pub mod analyzer;
pub mod app;
pub mod error;
pub mod image;
pub mod models;
pub mod normalize;
pub mod prompts;
pub mod server;

pub use error::{AnalysisError, Error, Result};
