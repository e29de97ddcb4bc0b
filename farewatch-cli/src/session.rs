use chrono::Utc;
use farewatch_core::replies;
use farewatch_offer::LocalFallback;
use farewatch_shared::{ChatMessage, ChatReply, Conversation, Role};
use rand::rngs::StdRng;

use crate::client::ChatClient;

pub const WELCOME: &str = "Hi there! I'm your AI-powered flight price tracker assistant. Tell me where you'd like to fly, and I'll help you find the best deals and track prices for you. For example, you can ask: 'Track flights from New York to London for next month' or 'What's the average price from Dubai to Mumbai?'";

/// One chat session. Replies come from the service when it answers in
/// time, otherwise from the local fallback.
pub struct Session {
    conversation: Conversation,
    client: Option<ChatClient>,
    fallback: LocalFallback,
    rng: StdRng,
}

impl Session {
    /// `client` is `None` in offline mode.
    pub fn new(client: Option<ChatClient>, rng: StdRng) -> Self {
        let mut conversation = Conversation::new();
        conversation.push(ChatMessage::new(Role::Assistant, WELCOME));

        Self {
            conversation,
            client,
            fallback: LocalFallback::new(),
            rng,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Record `text` and return the assistant messages it produced.
    pub async fn ask(&mut self, text: &str) -> anyhow::Result<Vec<ChatMessage>> {
        self.conversation.push(ChatMessage::new(Role::User, text));
        let start = self.conversation.len();

        let remote = match &self.client {
            Some(client) => match client.send(&self.conversation.turns()).await {
                Ok(reply) => Some(reply),
                Err(e) => {
                    tracing::warn!(error = %e, "Chat service unavailable, using local fallback");
                    self.conversation.push(ChatMessage::new(Role::Assistant, replies::BACKUP_NOTICE));
                    None
                }
            },
            None => None,
        };

        let reply = match remote {
            Some(reply) => reply,
            None => self.local_reply(text)?,
        };
        self.conversation.push(ChatMessage::from_reply(reply));

        Ok(self.conversation.messages()[start..].to_vec())
    }

    fn local_reply(&mut self, text: &str) -> anyhow::Result<ChatReply> {
        let today = Utc::now().date_naive();
        Ok(self.fallback.respond(text, today, &mut self.rng)?)
    }
}
