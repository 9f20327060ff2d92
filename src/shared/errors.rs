use thiserror::Error;

/// Common storage-related errors used across plugins.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse data: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to create directory: {0}")]
    DirectoryError(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn directory(msg: impl Into<String>) -> Self {
        StorageError::DirectoryError(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        StorageError::Unavailable(msg.into())
    }
}

/// Failures reported by host platform integrations (audio, notifications, picker, network).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    #[error("Audio error: {0}")]
    Audio(String),
    #[error("Notification error: {0}")]
    Notification(String),
    #[error("Document picker error: {0}")]
    Picker(String),
    #[error("Chat request failed: {0}")]
    Chat(String),
}

/// User input rejected before any state change. Shown to the user as a blocking alert.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a task before adding.")]
    TaskRequired,
    #[error("Please select a date from the calendar.")]
    DateRequired,
    #[error("Please select a future time for the reminder.")]
    TimeNotInFuture,
    #[error("Please enter a to-do before adding.")]
    TodoRequired,
    #[error("Playlist name cannot be empty.")]
    PlaylistNameRequired,
    #[error("A playlist named \"{0}\" already exists.")]
    PlaylistNameTaken(String),
}

impl ValidationError {
    /// Alert title paired with the message.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::TaskRequired | ValidationError::TodoRequired => "Task Required",
            ValidationError::DateRequired => "Date Required",
            ValidationError::TimeNotInFuture => "Invalid Time",
            ValidationError::PlaylistNameRequired | ValidationError::PlaylistNameTaken(_) => {
                "Invalid Name"
            }
        }
    }
}
