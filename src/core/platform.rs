use async_trait::async_trait;
use std::sync::Arc;

use super::audio::AudioEngine;
use super::notifications::NotificationScheduler;
use super::picker::DocumentPicker;
use crate::shared::errors::ValidationError;
use crate::shared::time::{Clock, SystemClock};
use crate::storage::KeyValueStorage;

/// A destructive action awaiting the user's Cancel/Delete choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: &'static str,
    pub message: String,
    pub confirm_label: &'static str,
}

impl ConfirmRequest {
    pub fn delete(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            title,
            message: message.into(),
            confirm_label: "Delete",
        }
    }
}

/// Blocking user prompts.
#[async_trait]
pub trait Prompt: Send + Sync {
    /// Show a message the user must dismiss.
    async fn alert(&self, title: &str, message: &str);

    /// Ask for confirmation. `true` only when the user picked the confirm choice.
    async fn confirm(&self, request: &ConfirmRequest) -> bool;
}

/// Show a validation failure to the user and hand the error back for propagation.
pub async fn reject(prompt: &dyn Prompt, target: &'static str, err: ValidationError) -> ValidationError {
    match target {
        "tasks" => tracing::debug!(target: "tasks", "Rejected input: {}", err),
        "todo" => tracing::debug!(target: "todo", "Rejected input: {}", err),
        "music" => tracing::debug!(target: "music", "Rejected input: {}", err),
        _ => tracing::debug!(target: "system", "Rejected input: {}", err),
    }
    prompt.alert(err.title(), &err.to_string()).await;
    err
}

/// The host-provided collaborators every screen draws from.
#[derive(Clone)]
pub struct Platform {
    pub storage: Arc<dyn KeyValueStorage>,
    pub notifications: Arc<dyn NotificationScheduler>,
    pub audio: Arc<dyn AudioEngine>,
    pub picker: Arc<dyn DocumentPicker>,
    pub prompt: Arc<dyn Prompt>,
    pub clock: Arc<dyn Clock>,
}

impl Platform {
    /// Bundle collaborators using the system clock.
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        notifications: Arc<dyn NotificationScheduler>,
        audio: Arc<dyn AudioEngine>,
        picker: Arc<dyn DocumentPicker>,
        prompt: Arc<dyn Prompt>,
    ) -> Self {
        Self {
            storage,
            notifications,
            audio,
            picker,
            prompt,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
