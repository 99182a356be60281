//! Generative model access for Articlecast.
//!
//! Pipeline stages only see the [`LanguageModel`] trait: a prompt goes in,
//! free text comes out. [`OllamaModel`] is the production implementation.

mod ollama;

pub use ollama::OllamaModel;

use articlecast_shared::Result;

/// A text-completion model. No streaming and no structured output.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Complete `prompt` and return the raw model text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
