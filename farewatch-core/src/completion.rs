use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// A single prompt for a hosted text-generation model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            temperature,
            max_output_tokens: None,
        }
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Completion timed out after {0:?}")]
    Timeout(Duration),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Malformed model response: {0}")]
    Malformed(String),
}

/// Hosted text-completion capability. Implementations return the model's
/// raw text; callers own any parsing.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Model identifier, for logs.
    fn model(&self) -> &str;

    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}
