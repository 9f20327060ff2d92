use serde::{Deserialize, Serialize};

use crate::shared::records::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub task: String,
    #[serde(default)]
    pub completed: bool,
}

impl Record for TodoItem {
    fn id(&self) -> &str {
        &self.id
    }
}

pub type TodoList = Vec<TodoItem>;
