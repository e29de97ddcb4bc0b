//! HTTP client for the chat endpoint.

use std::time::Duration;

use farewatch_shared::{ChatReply, ChatTurn};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service responded with status {0}")]
    Status(u16),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatTurn],
}

pub struct ChatClient {
    inner: reqwest::Client,
    url: String,
}

impl ChatClient {
    /// Every request is abandoned after `timeout`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { inner, url: url.to_string() })
    }

    pub async fn send(&self, turns: &[ChatTurn]) -> Result<ChatReply, ClientError> {
        debug!(url = %self.url, turns = turns.len(), "POST chat");

        let response = self
            .inner
            .post(&self.url)
            .json(&ChatRequest { messages: turns })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}
