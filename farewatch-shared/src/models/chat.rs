use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::flight::{FlightOffer, PriceStatistics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[default]
    Assistant,
}

/// One `{role, content}` pair as it travels in a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Body of the chat endpoint's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    #[serde(default)]
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_prices: Option<Vec<FlightOffer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_data: Option<PriceStatistics>,
}

impl ChatReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            flight_prices: None,
            price_data: None,
        }
    }

    pub fn with_offers(mut self, offers: Vec<FlightOffer>) -> Self {
        self.flight_prices = Some(offers);
        self
    }

    pub fn with_statistics(mut self, stats: PriceStatistics) -> Self {
        self.price_data = Some(stats);
        self
    }
}

/// A message in a conversation log. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub flight_prices: Option<Vec<FlightOffer>>,
    pub price_data: Option<PriceStatistics>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            created_at: Utc::now(),
            flight_prices: None,
            price_data: None,
        }
    }

    pub fn from_reply(reply: ChatReply) -> Self {
        Self {
            flight_prices: reply.flight_prices,
            price_data: reply.price_data,
            ..Self::new(reply.role, reply.content)
        }
    }

    pub fn turn(&self) -> ChatTurn {
        ChatTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// Ordered, append-only message log.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn turns(&self) -> Vec<ChatTurn> {
        self.messages.iter().map(ChatMessage::turn).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
