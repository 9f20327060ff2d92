use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ChatError;
use crate::core::settings::AppSettings;
use crate::shared::errors::PlatformError;

/// Remote assistant answering one message at a time.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `Ok(None)` when the backend answered without a usable reply.
    async fn send(&self, message: &str) -> Result<Option<String>, PlatformError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    reply: Option<String>,
}

/// JSON over HTTP: `POST {"message": ...}` answered by `{"reply": ...}`.
pub struct HttpChatBackend {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpChatBackend {
    pub fn new(settings: &AppSettings) -> Result<Self, ChatError> {
        let endpoint = reqwest::Url::parse(&settings.chat_endpoint)
            .map_err(|e| ChatError::InvalidEndpoint(format!("{}: {}", settings.chat_endpoint, e)))?;
        let client = reqwest::Client::builder()
            .timeout(settings.chat_timeout())
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, message: &str) -> Result<Option<String>, PlatformError> {
        let resp = self
            .client
            .post(self.endpoint.clone())
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| PlatformError::Chat(format!("request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(PlatformError::Chat(format!("server returned {}", resp.status())));
        }

        let body: ChatReply = resp
            .json()
            .await
            .map_err(|e| PlatformError::Chat(format!("invalid response body: {}", e)))?;

        Ok(body.reply.filter(|reply| !reply.trim().is_empty()))
    }
}
