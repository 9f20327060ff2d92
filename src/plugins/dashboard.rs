//! Home screen summary, computed from collection snapshots.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::music::types::Playlists;
use super::tasks::types::Task;
use super::tasks::views;
use super::todo::types::TodoItem;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub tasks_today: usize,
    pub upcoming: Vec<Task>,
    pub pending_reminders: usize,
    pub playlists: usize,
    pub tracks: usize,
    pub open_todos: usize,
    pub completed_todos: usize,
}

impl Overview {
    pub fn build(
        tasks: &[Task],
        todos: &[TodoItem],
        playlists: &Playlists,
        now: NaiveDateTime,
        upcoming_limit: usize,
    ) -> Self {
        let completed_todos = todos.iter().filter(|todo| todo.completed).count();

        Self {
            tasks_today: views::tasks_for_date(tasks, now.date()).len(),
            upcoming: views::upcoming(tasks, now, upcoming_limit)
                .into_iter()
                .cloned()
                .collect(),
            pending_reminders: views::pending_reminders(tasks, now),
            playlists: playlists.len(),
            tracks: playlists.iter().map(|playlist| playlist.tracks.len()).sum(),
            open_todos: todos.len() - completed_todos,
            completed_todos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notifications::ReminderId;
    use crate::plugins::music::types::Track;
    use chrono::{NaiveDate, NaiveTime};

    fn task(id: &str, day: u32, hour: u32, reminder: bool) -> Task {
        Task {
            id: id.to_string(),
            text: format!("task {}", id),
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            reminder_id: reminder.then(|| ReminderId(format!("r-{}", id))),
        }
    }

    #[test]
    fn test_overview_counts() {
        let now = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let tasks = vec![
            task("a", 1, 9, true),
            task("b", 1, 15, true),
            task("c", 2, 8, false),
        ];
        let todos = vec![
            TodoItem {
                id: "t1".to_string(),
                task: "milk".to_string(),
                completed: true,
            },
            TodoItem {
                id: "t2".to_string(),
                task: "eggs".to_string(),
                completed: false,
            },
        ];
        let mut playlists = Playlists::new();
        playlists.insert("Mix", vec![Track::new("file:///1.mp3", None)]);
        playlists.insert("Empty", Vec::new());

        let overview = Overview::build(&tasks, &todos, &playlists, now, 3);

        assert_eq!(overview.tasks_today, 2);
        let upcoming: Vec<&str> = overview.upcoming.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(upcoming, vec!["b", "c"]);
        assert_eq!(overview.pending_reminders, 1);
        assert_eq!(overview.playlists, 2);
        assert_eq!(overview.tracks, 1);
        assert_eq!(overview.open_todos, 1);
        assert_eq!(overview.completed_todos, 1);
    }
}
