//! Pure task list transformations. Validation happens in the screen.

use chrono::{NaiveDate, NaiveTime};

use super::types::{Task, TaskPatch};
use crate::shared::records::{new_id, remove_by_id, update_by_id};

/// Append a new task without a reminder.
pub fn add(tasks: &[Task], text: &str, date: NaiveDate, time: NaiveTime) -> (Vec<Task>, Task) {
    let task = Task {
        id: new_id(),
        text: text.to_string(),
        date,
        time,
        reminder_id: None,
    };

    let mut next = tasks.to_vec();
    next.push(task.clone());
    (next, task)
}

/// Merge `patch` into the matching task. Unchanged copy when absent.
pub fn update(tasks: &[Task], id: &str, patch: TaskPatch) -> Vec<Task> {
    update_by_id(tasks, id, |task| patch.apply_to(task))
}

pub fn remove(tasks: &[Task], id: &str) -> Vec<Task> {
    remove_by_id(tasks, id)
}
