use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::core::notifications::ReminderId;
use crate::shared::records::Record;
use crate::shared::time::hhmm;

/// A dated task with a reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    /// Calendar date, stored as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Time of day, stored as `HH:mm`.
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    /// Handle of the pending reminder, if one was scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_id: Option<ReminderId>,
}

impl Task {
    /// Point in time the task is due. Never persisted.
    pub fn date_time(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

pub type TaskList = Vec<Task>;

/// Form input for creating or editing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub text: String,
    /// `None` until a day is picked on the calendar.
    pub date: Option<NaiveDate>,
    pub time: NaiveTime,
}

impl TaskDraft {
    pub fn new(text: impl Into<String>, date: Option<NaiveDate>, time: NaiveTime) -> Self {
        Self {
            text: text.into(),
            date,
            time,
        }
    }

    /// Pre-fill the form from an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            text: task.text.clone(),
            date: Some(task.date),
            time: task.time,
        }
    }
}

/// Partial update merged into an existing task. `None` keeps the old value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub reminder_id: Option<Option<ReminderId>>,
}

impl TaskPatch {
    pub fn apply_to(self, task: &Task) -> Task {
        Task {
            id: task.id.clone(),
            text: self.text.unwrap_or_else(|| task.text.clone()),
            date: self.date.unwrap_or(task.date),
            time: self.time.unwrap_or(task.time),
            reminder_id: self
                .reminder_id
                .unwrap_or_else(|| task.reminder_id.clone()),
        }
    }
}
