//! Board-column partitioning of the task collection.

use taskdeck_proto::task::{FullTask, TaskStatus};

/// The task collection split into the four board columns.
///
/// Every task lands in exactly one column based on its workflow stage;
/// within a column, tasks keep the order of the source collection.
#[derive(Debug, Clone, Default)]
pub struct BoardColumns {
    /// Tasks not yet started.
    pub to_do: Vec<FullTask>,
    /// Tasks actively being worked on.
    pub in_progress: Vec<FullTask>,
    /// Tasks waiting on review.
    pub awaiting_feedback: Vec<FullTask>,
    /// Completed tasks.
    pub done: Vec<FullTask>,
}

impl BoardColumns {
    /// Partition a task collection into board columns.
    #[must_use]
    pub fn partition(tasks: &[FullTask]) -> Self {
        let mut columns = Self::default();
        for task in tasks {
            match task.task.status {
                TaskStatus::ToDo => columns.to_do.push(task.clone()),
                TaskStatus::InProgress => columns.in_progress.push(task.clone()),
                TaskStatus::AwaitingFeedback => columns.awaiting_feedback.push(task.clone()),
                TaskStatus::Done => columns.done.push(task.clone()),
            }
        }
        columns
    }

    /// The tasks in the column for the given workflow stage.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[FullTask] {
        match status {
            TaskStatus::ToDo => &self.to_do,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::AwaitingFeedback => &self.awaiting_feedback,
            TaskStatus::Done => &self.done,
        }
    }

    /// Total number of tasks across all columns.
    #[must_use]
    pub fn total(&self) -> usize {
        self.to_do.len() + self.in_progress.len() + self.awaiting_feedback.len() + self.done.len()
    }
}
