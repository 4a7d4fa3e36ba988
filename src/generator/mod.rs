//! Generative text model access

use async_trait::async_trait;

use crate::Result;

pub mod gemini;

pub use gemini::GeminiClient;

/// A single prompt-completion call
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the model's prose for `prompt`, or `PlanGenerationFailed`
    async fn generate(&self, prompt: &str) -> Result<String>;
}
