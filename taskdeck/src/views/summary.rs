//! Summary screen: greeting and board statistics.

use chrono::NaiveDate;
use taskdeck_proto::task::{FullTask, TaskPriority, TaskStatus};

/// Time-of-day greeting for an hour in `0..24`.
#[must_use]
pub const fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

/// Aggregated board numbers shown on the summary screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardStats {
    /// Tasks on the board overall.
    pub total: usize,
    /// Tasks not yet started.
    pub to_do: usize,
    /// Tasks in progress.
    pub in_progress: usize,
    /// Tasks awaiting feedback.
    pub awaiting_feedback: usize,
    /// Completed tasks.
    pub done: usize,
    /// Tasks marked urgent, across all columns.
    pub urgent: usize,
    /// Earliest due date among urgent tasks, if any.
    pub next_urgent_due: Option<NaiveDate>,
}

impl BoardStats {
    /// Compute the summary numbers from the task collection.
    #[must_use]
    pub fn from_tasks(tasks: &[FullTask]) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Self::default()
        };
        for full in tasks {
            match full.task.status {
                TaskStatus::ToDo => stats.to_do += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::AwaitingFeedback => stats.awaiting_feedback += 1,
                TaskStatus::Done => stats.done += 1,
            }
            if full.task.priority == TaskPriority::Urgent {
                stats.urgent += 1;
                let due = full.task.due_date;
                stats.next_urgent_due = Some(match stats.next_urgent_due {
                    Some(current) if current <= due => current,
                    _ => due,
                });
            }
        }
        stats
    }
}
