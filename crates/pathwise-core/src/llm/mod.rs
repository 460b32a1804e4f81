//! Text-generation client module
//!
//! Provides the [`TextGenerator`] abstraction and the Gemini implementation.

use std::sync::Arc;

use tracing::debug;

mod client;
mod error;
mod gemini;

pub use client::TextGenerator;
pub use error::LlmError;
pub use gemini::{GeminiClient, GeminiConfig};

/// Build a shared Gemini-backed generator from configuration.
pub fn create_generator(config: GeminiConfig) -> Result<Arc<dyn TextGenerator>, LlmError> {
    debug!(model = %config.model, base_url = %config.base_url, "create_generator: called");
    Ok(Arc::new(GeminiClient::new(config)?))
}
