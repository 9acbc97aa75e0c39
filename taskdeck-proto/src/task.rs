//! Task, subtask, and board-workflow types for `TaskDeck`.
//!
//! A task moves through four fixed workflow stages and may carry subtasks
//! and assignments to contacts (many-to-many). The hub resolves the joins
//! and ships a [`FullTask`] per row in a single `ListTasks` request.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::contact::ContactId;

/// Server-assigned row identifier for a task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct TaskId(pub i64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-assigned row identifier for a subtask.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct SubtaskId(pub i64);

impl std::fmt::Display for SubtaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Urgency of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    /// Needs attention now.
    Urgent,
    /// Default priority.
    Medium,
    /// Can wait.
    Low,
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Urgent => write!(f, "Urgent"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// Kind of work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskCategory {
    /// Implementation or maintenance work.
    TechnicalTask,
    /// Feature described from the user's perspective.
    UserStory,
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TechnicalTask => write!(f, "Technical Task"),
            Self::UserStory => write!(f, "User Story"),
        }
    }
}

/// Workflow stage of a task. Every task is in exactly one stage, and the
/// board partitions the task collection into these four columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not started.
    ToDo,
    /// Actively being worked on.
    InProgress,
    /// Done from the assignee's side, waiting on review.
    AwaitingFeedback,
    /// Completed.
    Done,
}

impl TaskStatus {
    /// All workflow stages in board-column order.
    pub const ALL: [Self; 4] = [
        Self::ToDo,
        Self::InProgress,
        Self::AwaitingFeedback,
        Self::Done,
    ];
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ToDo => write!(f, "To Do"),
            Self::InProgress => write!(f, "In Progress"),
            Self::AwaitingFeedback => write!(f, "Awaiting Feedback"),
            Self::Done => write!(f, "Done"),
        }
    }
}

/// A task row as stored by the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier.
    pub id: TaskId,
    /// Short title shown on the board card.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// When the task is due.
    pub due_date: NaiveDate,
    /// Urgency.
    pub priority: TaskPriority,
    /// Kind of work.
    pub category: TaskCategory,
    /// Current workflow stage.
    pub status: TaskStatus,
    /// When the row was inserted (set by the hub).
    pub created_at: DateTime<Utc>,
}

/// A subtask row: a checklist item owned by one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    /// Server-assigned identifier.
    pub id: SubtaskId,
    /// Owning task.
    pub task_id: TaskId,
    /// Checklist item text.
    pub title: String,
    /// Completion flag.
    pub is_done: bool,
}

/// The slice of a contact carried along with a task assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedContact {
    /// The assigned contact's id.
    pub id: ContactId,
    /// Display name.
    pub name: String,
    /// Accent color for the avatar badge.
    pub color: String,
    /// Email address.
    pub email: String,
}

/// A task joined with its subtasks and assigned contacts, as returned by
/// the hub's `ListTasks` in a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullTask {
    /// The task row itself.
    pub task: Task,
    /// Checklist items, in insertion order.
    pub subtasks: Vec<Subtask>,
    /// Assigned contacts, in assignment order.
    pub assignees: Vec<AssignedContact>,
}

impl FullTask {
    /// Number of completed subtasks.
    #[must_use]
    pub fn done_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.is_done).count()
    }
}

/// Creation payload for a new task with its initial subtasks and
/// assignments. The hub assigns all row ids and the creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Short title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// When the task is due.
    pub due_date: NaiveDate,
    /// Urgency.
    pub priority: TaskPriority,
    /// Kind of work.
    pub category: TaskCategory,
    /// Contacts to assign.
    pub assigned_contact_ids: Vec<ContactId>,
    /// Titles of the initial subtasks (all start not-done).
    pub subtask_titles: Vec<String>,
}
