pub mod client;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::shared::records::new_id;
pub use client::{ChatBackend, HttpChatBackend};

pub const ASSISTANT_NAME: &str = "NeX";
pub const GREETING: &str = "Hello, I'm NeX! Ask me anything!";
pub const MISSING_REPLY: &str = "Something went wrong.";
pub const CONNECTION_ERROR: &str = "🚨 Error connecting to server.";

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Invalid chat endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub content: String,
}

impl ChatMessage {
    fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            sender,
            content: content.into(),
        }
    }
}

/// One in-memory conversation. Nothing is persisted.
pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    messages: Mutex<Vec<ChatMessage>>,
    typing: AtomicBool,
}

impl ChatSession {
    /// Start a conversation that opens with the assistant's greeting.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            messages: Mutex::new(vec![ChatMessage::new(Sender::Assistant, GREETING)]),
            typing: AtomicBool::new(false),
        }
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock_messages().clone()
    }

    /// Whether a reply is being awaited.
    pub fn is_typing(&self) -> bool {
        self.typing.load(Ordering::SeqCst)
    }

    /// Post `input` and append the assistant's answer.
    ///
    /// Blank input is ignored. Backend failures never surface as errors: they
    /// become an assistant message carrying the fallback text.
    pub async fn send(&self, input: &str) -> Option<ChatMessage> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        self.lock_messages().push(ChatMessage::new(Sender::User, input));
        self.typing.store(true, Ordering::SeqCst);

        let content = match self.backend.send(input).await {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                tracing::warn!(target: "chat", "Backend answered without a reply");
                MISSING_REPLY.to_string()
            }
            Err(e) => {
                tracing::error!(target: "chat", "Chat request failed: {}", e);
                CONNECTION_ERROR.to_string()
            }
        };

        let reply = ChatMessage::new(Sender::Assistant, content);
        self.lock_messages().push(reply.clone());
        self.typing.store(false, Ordering::SeqCst);

        tracing::debug!(target: "chat", id = %reply.id, "Reply received");
        Some(reply)
    }

    fn lock_messages(&self) -> MutexGuard<'_, Vec<ChatMessage>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::errors::PlatformError;
    use async_trait::async_trait;

    struct Scripted(Result<Option<String>, PlatformError>);

    #[async_trait]
    impl ChatBackend for Scripted {
        async fn send(&self, _message: &str) -> Result<Option<String>, PlatformError> {
            self.0.clone()
        }
    }

    fn session(answer: Result<Option<String>, PlatformError>) -> ChatSession {
        ChatSession::new(Arc::new(Scripted(answer)))
    }

    #[tokio::test]
    async fn test_starts_with_greeting() {
        let chat = session(Ok(None));
        let messages = chat.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].sender, Sender::Assistant);
        assert_eq!(messages[0].content, GREETING);
        assert!(!chat.is_typing());
    }

    #[tokio::test]
    async fn test_reply_appended_after_user_message() {
        let chat = session(Ok(Some("42".to_string())));
        let reply = chat.send("  meaning of life? ").await.unwrap();

        assert_eq!(reply.content, "42");
        let messages = chat.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[1].content, "meaning of life?");
        assert_eq!(messages[2], reply);
        assert!(!chat.is_typing());
    }

    #[tokio::test]
    async fn test_fallback_texts() {
        let missing = session(Ok(None));
        assert_eq!(missing.send("hi").await.unwrap().content, MISSING_REPLY);

        let failing = session(Err(PlatformError::Chat("offline".to_string())));
        assert_eq!(failing.send("hi").await.unwrap().content, CONNECTION_ERROR);
    }

    #[tokio::test]
    async fn test_blank_input_ignored() {
        let chat = session(Ok(Some("x".to_string())));
        assert!(chat.send("   ").await.is_none());
        assert_eq!(chat.messages().len(), 1);
    }
}
