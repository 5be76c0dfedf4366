//! LLM Module
//!
//! The completion seam used by the chat service, its Mistral implementation,
//! and the retry wrapper every call goes through.

mod mistral;
mod prompt;
mod retry;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ChatTurn;

pub use mistral::MistralClient;
pub use prompt::{with_disclaimer, DISCLAIMER, SYSTEM_PROMPT};
pub use retry::{with_retry, RetryPolicy};

/// Parsed answer of one completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    /// `usage.total_tokens` when the service reports it
    pub total_tokens: Option<u64>,
    pub model: String,
}

/// A remote chat-completion service.
///
/// Implementations add their own system instruction; `turns` is the
/// conversation as it should be seen by the model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<Completion>;

    /// Configured model identifier, used to label log events.
    fn model_name(&self) -> &str;
}
