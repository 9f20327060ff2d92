use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::shared::errors::PlatformError;

/// A one-shot local notification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub body: String,
    /// Local wall-clock time at which the notification fires.
    pub fire_at: NaiveDateTime,
}

/// Opaque handle returned by the scheduler, kept so the reminder can be cancelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderId(pub String);

impl std::fmt::Display for ReminderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Platform notification scheduler.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Ask the user for permission to post notifications. Returns whether it was granted.
    async fn request_permission(&self) -> Result<bool, PlatformError>;

    async fn schedule_one_shot(&self, reminder: &Reminder) -> Result<ReminderId, PlatformError>;

    /// Cancel a pending reminder. Cancelling one that already fired is not an error.
    async fn cancel(&self, id: &ReminderId) -> Result<(), PlatformError>;
}
