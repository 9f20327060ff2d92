pub mod chat;
pub mod dashboard;
pub mod music;
pub mod tasks;
pub mod todo;
