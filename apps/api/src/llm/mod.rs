// Model adapter boundary
//
// Everything that talks to the hosted language model lives here. The rest of
// the crate only sees the `ModelAdapter` trait.

pub mod errors;
pub mod messages;
pub mod openai;

use async_trait::async_trait;

pub use errors::{LlmError, LlmResult};
pub use messages::{ChatMessage, GenerationSettings, MessageRole};
pub use openai::OpenAiAdapter;

/// Capability that turns rendered prompts into generated text
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Stateless single-string completion
    async fn complete(&self, prompt: &str, settings: &GenerationSettings) -> LlmResult<String>;

    /// Role-structured chat completion
    async fn chat(
        &self,
        messages: &[ChatMessage],
        settings: &GenerationSettings,
    ) -> LlmResult<String>;
}
