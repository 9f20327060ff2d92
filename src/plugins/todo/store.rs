//! Pure to-do list transformations. Validation happens in the screen.

use super::types::TodoItem;
use crate::shared::records::{new_id, remove_by_id, update_by_id};

/// Prepend a new, uncompleted item.
pub fn add(todos: &[TodoItem], task: &str) -> (Vec<TodoItem>, TodoItem) {
    let item = TodoItem {
        id: new_id(),
        task: task.to_string(),
        completed: false,
    };

    let mut next = Vec::with_capacity(todos.len() + 1);
    next.push(item.clone());
    next.extend_from_slice(todos);
    (next, item)
}

/// Invert `completed` on the matching item.
pub fn toggle(todos: &[TodoItem], id: &str) -> Vec<TodoItem> {
    update_by_id(todos, id, |item| TodoItem {
        completed: !item.completed,
        ..item.clone()
    })
}

pub fn remove(todos: &[TodoItem], id: &str) -> Vec<TodoItem> {
    remove_by_id(todos, id)
}
