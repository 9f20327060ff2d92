//! Read-only projections over the task list.

use chrono::{NaiveDate, NaiveDateTime};

use super::types::Task;

/// Tasks due on `date`, in list order.
pub fn tasks_for_date(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|task| task.date == date).collect()
}

/// The next `limit` tasks strictly after `now`, soonest first.
/// Tasks due at the same instant keep their list order.
pub fn upcoming(tasks: &[Task], now: NaiveDateTime, limit: usize) -> Vec<&Task> {
    let mut future: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.date_time() > now)
        .collect();

    // sort_by_key is stable
    future.sort_by_key(|task| task.date_time());
    future.truncate(limit);
    future
}

/// Tasks whose reminder has not fired yet.
pub fn pending_reminders(tasks: &[Task], now: NaiveDateTime) -> usize {
    tasks
        .iter()
        .filter(|task| task.reminder_id.is_some() && task.date_time() > now)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn task(id: &str, day: u32, hour: u32) -> Task {
        Task {
            id: id.to_string(),
            text: format!("task {}", id),
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            reminder_id: None,
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_tasks_for_date_keeps_order() {
        let tasks = vec![task("a", 3, 18), task("b", 4, 9), task("c", 3, 7)];
        let day = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        assert_eq!(ids(&tasks_for_date(&tasks, day)), vec!["a", "c"]);
    }

    #[test]
    fn test_upcoming_excludes_past_and_now() {
        let tasks = vec![
            task("past", 1, 9),
            task("now", 2, 12),
            task("later", 2, 13),
        ];
        assert_eq!(ids(&upcoming(&tasks, now(), 3)), vec!["later"]);
    }

    #[test]
    fn test_upcoming_sorted_and_limited() {
        let tasks = vec![
            task("d", 9, 9),
            task("a", 3, 9),
            task("c", 5, 9),
            task("b", 4, 9),
        ];
        let result = upcoming(&tasks, now(), 3);
        assert_eq!(ids(&result), vec!["a", "b", "c"]);
        assert!(result.windows(2).all(|w| w[0].date_time() <= w[1].date_time()));
    }

    #[test]
    fn test_upcoming_ties_keep_list_order() {
        let tasks = vec![task("x", 5, 9), task("y", 3, 9), task("z", 5, 9)];
        assert_eq!(ids(&upcoming(&tasks, now(), 3)), vec!["y", "x", "z"]);
    }

    #[test]
    fn test_pending_reminders_counts_future_scheduled() {
        let mut scheduled = task("s", 5, 9);
        scheduled.reminder_id = Some(crate::core::notifications::ReminderId("r".to_string()));
        let mut fired = task("f", 1, 9);
        fired.reminder_id = Some(crate::core::notifications::ReminderId("r2".to_string()));

        let tasks = vec![scheduled, fired, task("n", 6, 9)];
        assert_eq!(pending_reminders(&tasks, now()), 1);
    }
}
