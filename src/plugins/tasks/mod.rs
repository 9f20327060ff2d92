pub mod store;
pub mod types;
pub mod views;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::Arc;
use thiserror::Error;

use crate::core::notifications::{NotificationScheduler, Reminder, ReminderId};
use crate::core::platform::{reject, ConfirmRequest, Platform, Prompt};
use crate::core::settings::AppSettings;
use crate::shared::errors::ValidationError;
use crate::shared::records::{contains, find};
use crate::shared::time::{truncate_to_minute, Clock};
use crate::storage::{Persisted, SnapshotStore, TASKS_KEY};
use types::{Task, TaskDraft, TaskList, TaskPatch};

#[derive(Error, Debug)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Task not found: {0}")]
    NotFound(String),
}

/// Validated form input.
struct ValidTask {
    text: String,
    date: NaiveDate,
    time: NaiveTime,
    fire_at: NaiveDateTime,
}

/// Task & reminder screen state.
///
/// Every mutation validates input, commits a new snapshot, awaits the
/// storage write, and keeps the platform reminder in step with the task:
/// scheduled on create, rescheduled on edit, cancelled on delete.
/// Mutations hold `ops` for their whole duration, so a reminder read from
/// a task is still that task's reminder when it is cancelled.
pub struct TaskScreen {
    ops: tokio::sync::Mutex<()>,
    store: SnapshotStore<TaskList>,
    persisted: Persisted<TaskList>,
    notifications: Arc<dyn NotificationScheduler>,
    prompt: Arc<dyn Prompt>,
    clock: Arc<dyn Clock>,
    reminder_title: String,
    upcoming_limit: usize,
}

impl TaskScreen {
    /// Load stored tasks and ask for notification permission.
    /// Must be called from within a tokio runtime.
    pub async fn open(platform: &Platform, settings: &AppSettings) -> Self {
        let persisted = Persisted::new(Arc::clone(&platform.storage), TASKS_KEY);
        let tasks: TaskList = persisted.load().await;
        tracing::info!(target: "tasks", "Tasks loaded: {} tasks", tasks.len());

        match platform.notifications.request_permission().await {
            Ok(true) => tracing::info!(target: "tasks", "Notification permission granted"),
            Ok(false) => tracing::warn!(target: "tasks", "Notification permission not granted"),
            Err(e) => tracing::error!(target: "tasks", "Notification permission request failed: {}", e),
        }

        Self {
            ops: tokio::sync::Mutex::new(()),
            store: SnapshotStore::new(tasks),
            persisted,
            notifications: Arc::clone(&platform.notifications),
            prompt: Arc::clone(&platform.prompt),
            clock: Arc::clone(&platform.clock),
            reminder_title: settings.reminder_title.clone(),
            upcoming_limit: settings.upcoming_limit,
        }
    }

    pub fn tasks(&self) -> Arc<TaskList> {
        self.store.snapshot()
    }

    pub fn tasks_for_date(&self, date: NaiveDate) -> Vec<Task> {
        views::tasks_for_date(&self.store.snapshot(), date)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The next few tasks after the current time, soonest first.
    pub fn upcoming(&self) -> Vec<Task> {
        views::upcoming(&self.store.snapshot(), self.clock.now(), self.upcoming_limit)
            .into_iter()
            .cloned()
            .collect()
    }

    async fn validate(&self, draft: &TaskDraft) -> Result<ValidTask, ValidationError> {
        let text = draft.text.trim();
        if text.is_empty() {
            return Err(reject(self.prompt.as_ref(), "tasks", ValidationError::TaskRequired).await);
        }

        let Some(date) = draft.date else {
            return Err(reject(self.prompt.as_ref(), "tasks", ValidationError::DateRequired).await);
        };

        let time = truncate_to_minute(draft.time);
        let fire_at = date.and_time(time);
        if fire_at <= self.clock.now() {
            return Err(reject(self.prompt.as_ref(), "tasks", ValidationError::TimeNotInFuture).await);
        }

        Ok(ValidTask {
            text: text.to_string(),
            date,
            time,
            fire_at,
        })
    }

    pub async fn add_task(&self, draft: TaskDraft) -> Result<Task, TaskError> {
        let _op = self.ops.lock().await;
        let valid = self.validate(&draft).await?;
        let reminder_id = self.schedule_reminder(&valid.text, valid.fire_at).await;

        let (snapshot, task) = self.store.apply(|tasks| {
            let (next, task) = store::add(tasks, &valid.text, valid.date, valid.time);
            let patch = TaskPatch {
                reminder_id: Some(reminder_id.clone()),
                ..TaskPatch::default()
            };
            let next = store::update(&next, &task.id, patch.clone());
            (next, patch.apply_to(&task))
        });

        tracing::info!(
            target: "tasks",
            id = %task.id,
            fire_at = %valid.fire_at,
            has_reminder = task.reminder_id.is_some(),
            "Task added"
        );

        self.persisted.save(&snapshot).await;
        Ok(task)
    }

    /// Replace text, date and time of an existing task and reschedule its reminder.
    pub async fn update_task(&self, id: &str, draft: TaskDraft) -> Result<Task, TaskError> {
        let _op = self.ops.lock().await;
        let Some(existing) = find(&self.store.snapshot(), id).cloned() else {
            tracing::warn!(target: "tasks", id, "Update ignored, task not found");
            return Err(TaskError::NotFound(id.to_string()));
        };

        let valid = self.validate(&draft).await?;

        self.cancel_reminder(existing.reminder_id.as_ref()).await;
        let reminder_id = self.schedule_reminder(&valid.text, valid.fire_at).await;

        let patch = TaskPatch {
            text: Some(valid.text),
            date: Some(valid.date),
            time: Some(valid.time),
            reminder_id: Some(reminder_id.clone()),
        };
        let (snapshot, task) = self.store.apply(|tasks| {
            let next = store::update(tasks, id, patch.clone());
            let task = find(&next, id).cloned();
            (next, task)
        });

        let Some(task) = task else {
            self.cancel_reminder(reminder_id.as_ref()).await;
            return Err(TaskError::NotFound(id.to_string()));
        };

        tracing::info!(target: "tasks", id, fire_at = %valid.fire_at, "Task updated");
        self.persisted.save(&snapshot).await;
        Ok(task)
    }

    /// Delete after the user confirms and cancel the pending reminder.
    /// Returns `false` when the user cancelled.
    pub async fn delete_task(&self, id: &str) -> Result<bool, TaskError> {
        let _op = self.ops.lock().await;
        if !contains(&self.store.snapshot(), id) {
            return Err(TaskError::NotFound(id.to_string()));
        }

        let request = ConfirmRequest::delete(
            "Confirm Delete",
            "Are you sure you want to delete this task?",
        );
        if !self.prompt.confirm(&request).await {
            tracing::debug!(target: "tasks", id, "Delete cancelled");
            return Ok(false);
        }

        let (snapshot, removed) = self.store.apply(|tasks| {
            let removed = find(tasks, id).cloned();
            (store::remove(tasks, id), removed)
        });

        let Some(removed) = removed else {
            return Err(TaskError::NotFound(id.to_string()));
        };

        tracing::info!(target: "tasks", id, "Task deleted");
        self.persisted.save(&snapshot).await;
        self.cancel_reminder(removed.reminder_id.as_ref()).await;
        Ok(true)
    }

    async fn schedule_reminder(&self, body: &str, fire_at: NaiveDateTime) -> Option<ReminderId> {
        let reminder = Reminder {
            title: self.reminder_title.clone(),
            body: body.to_string(),
            fire_at,
        };

        match self.notifications.schedule_one_shot(&reminder).await {
            Ok(reminder_id) => {
                tracing::debug!(target: "tasks", reminder_id = %reminder_id, fire_at = %fire_at, "Reminder scheduled");
                Some(reminder_id)
            }
            Err(e) => {
                tracing::error!(target: "tasks", fire_at = %fire_at, "Failed to schedule reminder: {}", e);
                None
            }
        }
    }

    async fn cancel_reminder(&self, reminder_id: Option<&ReminderId>) {
        let Some(reminder_id) = reminder_id else {
            return;
        };

        if let Err(e) = self.notifications.cancel(reminder_id).await {
            tracing::warn!(target: "tasks", reminder_id = %reminder_id, "Failed to cancel reminder: {}", e);
        }
    }

    /// Flush pending writes and stop the writer.
    pub async fn close(self) {
        self.persisted.close().await;
    }
}
