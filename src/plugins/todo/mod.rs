pub mod store;
pub mod types;

use std::sync::Arc;
use thiserror::Error;

use crate::core::platform::{reject, ConfirmRequest, Platform, Prompt};
use crate::shared::errors::ValidationError;
use crate::shared::records::find;
use crate::storage::{Persisted, SnapshotStore, TODOS_KEY};
use types::{TodoItem, TodoList};

#[derive(Error, Debug)]
pub enum TodoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("To-do not found: {0}")]
    NotFound(String),
}

/// To-do list screen state: the list, its storage mirror, and the prompt used for confirmations.
pub struct TodoScreen {
    store: SnapshotStore<TodoList>,
    persisted: Persisted<TodoList>,
    prompt: Arc<dyn Prompt>,
}

impl TodoScreen {
    /// Load the stored list. Must be called from within a tokio runtime.
    pub async fn open(platform: &Platform) -> Self {
        let persisted = Persisted::new(Arc::clone(&platform.storage), TODOS_KEY);
        let todos: TodoList = persisted.load().await;
        tracing::info!(target: "todo", "To-do list loaded: {} items", todos.len());

        Self {
            store: SnapshotStore::new(todos),
            persisted,
            prompt: Arc::clone(&platform.prompt),
        }
    }

    pub fn todos(&self) -> Arc<TodoList> {
        self.store.snapshot()
    }

    pub async fn add(&self, task: &str) -> Result<TodoItem, TodoError> {
        let task = task.trim();
        if task.is_empty() {
            return Err(reject(self.prompt.as_ref(), "todo", ValidationError::TodoRequired)
                .await
                .into());
        }

        let (snapshot, item) = self.store.apply(|todos| store::add(todos, task));
        tracing::info!(target: "todo", id = %item.id, "To-do added");

        self.persisted.save(&snapshot).await;
        Ok(item)
    }

    pub async fn toggle(&self, id: &str) -> Result<TodoItem, TodoError> {
        let (snapshot, item) = self.store.apply(|todos| {
            let next = store::toggle(todos, id);
            let item = find(&next, id).cloned();
            (next, item)
        });

        let Some(item) = item else {
            tracing::warn!(target: "todo", id, "Toggle ignored, to-do not found");
            return Err(TodoError::NotFound(id.to_string()));
        };

        tracing::debug!(target: "todo", id, completed = item.completed, "To-do toggled");
        self.persisted.save(&snapshot).await;
        Ok(item)
    }

    /// Delete after the user confirms. Returns `false` when the user cancelled.
    pub async fn delete(&self, id: &str) -> Result<bool, TodoError> {
        let Some(item) = find(&self.store.snapshot(), id).cloned() else {
            return Err(TodoError::NotFound(id.to_string()));
        };

        let request = ConfirmRequest::delete(
            "Confirm Delete",
            format!("Are you sure you want to delete \"{}\"?", item.task),
        );
        if !self.prompt.confirm(&request).await {
            tracing::debug!(target: "todo", id, "Delete cancelled");
            return Ok(false);
        }

        let (snapshot, ()) = self.store.apply(|todos| (store::remove(todos, id), ()));
        tracing::info!(target: "todo", id, "To-do deleted");

        self.persisted.save(&snapshot).await;
        Ok(true)
    }

    /// Flush pending writes and stop the writer.
    pub async fn close(self) {
        self.persisted.close().await;
    }
}
