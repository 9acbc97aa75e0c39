//! Kanban board view: column focus, task selection, search, and the
//! task detail overlay.

use std::time::{Duration, Instant};

use taskdeck_proto::task::{FullTask, TaskId, TaskStatus};

use super::Pending;

/// The workflow stage after `status`, or `None` at the last column.
#[must_use]
pub fn next_status(status: TaskStatus) -> Option<TaskStatus> {
    let pos = TaskStatus::ALL.iter().position(|s| *s == status)?;
    TaskStatus::ALL.get(pos + 1).copied()
}

/// The workflow stage before `status`, or `None` at the first column.
#[must_use]
pub fn prev_status(status: TaskStatus) -> Option<TaskStatus> {
    let pos = TaskStatus::ALL.iter().position(|s| *s == status)?;
    pos.checked_sub(1).map(|p| TaskStatus::ALL[p])
}

/// Case-insensitive substring match against title and description.
///
/// An empty or whitespace-only query matches everything.
#[must_use]
pub fn matches_search(task: &FullTask, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    if task.task.title.to_lowercase().contains(&query) {
        return true;
    }
    task.task
        .description
        .as_ref()
        .is_some_and(|d| d.to_lowercase().contains(&query))
}

/// State of the board screen.
///
/// The detail overlay closes with a short delay like the contact
/// dialogs; see [`super::Pending`].
#[derive(Debug)]
pub struct BoardView {
    /// The focused column.
    pub column: TaskStatus,
    /// Selected row within the focused column.
    pub selected: usize,
    /// Task shown in the detail overlay, if open.
    pub detail: Option<TaskId>,
    /// Current search query filtering all columns.
    pub search: String,
    /// Whether the search input has focus.
    pub searching: bool,
    pending: Option<Pending<Option<TaskId>>>,
}

impl Default for BoardView {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardView {
    /// A fresh board view focused on the first column.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            column: TaskStatus::ToDo,
            selected: 0,
            detail: None,
            search: String::new(),
            searching: false,
            pending: None,
        }
    }

    /// Move focus one column to the left, keeping it at the first.
    pub fn focus_left(&mut self) {
        if let Some(prev) = prev_status(self.column) {
            self.column = prev;
            self.selected = 0;
        }
    }

    /// Move focus one column to the right, keeping it at the last.
    pub fn focus_right(&mut self) {
        if let Some(next) = next_status(self.column) {
            self.column = next;
            self.selected = 0;
        }
    }

    /// Move the selection up within the focused column.
    pub const fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Move the selection down, bounded by the column length.
    pub fn select_next(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    /// Keep the selection valid after the column contents changed.
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Open the detail overlay for a task, cancelling a pending close.
    pub fn open_detail(&mut self, id: TaskId) {
        self.pending = None;
        self.detail = Some(id);
    }

    /// Schedule the detail overlay to close after `delay`.
    ///
    /// A previously scheduled close is replaced.
    pub fn schedule_close(&mut self, now: Instant, delay: Duration) {
        self.pending = Some(Pending::new(None, now + delay));
    }

    /// Apply the pending overlay transition if it is due.
    pub fn tick(&mut self, now: Instant) {
        if let Some(pending) = &self.pending
            && pending.is_due(now)
        {
            let pending = self.pending.take();
            if let Some(p) = pending {
                self.detail = p.next;
            }
        }
    }

    /// Whether an overlay transition is pending.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The tasks of `column` that match the current search query.
    #[must_use]
    pub fn visible<'a>(&self, column: &'a [FullTask]) -> Vec<&'a FullTask> {
        column
            .iter()
            .filter(|task| matches_search(task, &self.search))
            .collect()
    }
}
