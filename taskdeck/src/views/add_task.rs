//! Add-task form: field state, validation, and conversion into a
//! creation payload.

use chrono::NaiveDate;
use taskdeck_proto::contact::ContactId;
use taskdeck_proto::task::{TaskCategory, TaskDraft, TaskPriority};

/// Which part of the add-task form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddTaskField {
    /// Title input.
    #[default]
    Title,
    /// Description input.
    Description,
    /// Due date input.
    DueDate,
    /// Priority selector.
    Priority,
    /// Category selector.
    Category,
    /// Assignee picker.
    Assignees,
    /// Subtask list and input.
    Subtasks,
}

/// Validation failures for the add-task form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TaskFormError {
    /// The title must not be empty.
    #[error("a title is required")]
    TitleRequired,
    /// A category must be selected.
    #[error("select a category")]
    CategoryRequired,
    /// The due date must be entered.
    #[error("a due date is required")]
    DateRequired,
    /// The due date does not parse as `YYYY-MM-DD`.
    #[error("enter the due date as YYYY-MM-DD")]
    DateInvalid,
    /// The due date lies in the past.
    #[error("the due date must not be in the past")]
    DatePast,
}

/// Date format accepted by the due date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// State of the add-task form.
#[derive(Debug, Clone, Default)]
pub struct AddTaskForm {
    /// Title input.
    pub title: String,
    /// Description input.
    pub description: String,
    /// Due date input, `YYYY-MM-DD`.
    pub due_date: String,
    /// Selected priority.
    pub priority: Option<TaskPriority>,
    /// Selected category, required before submit.
    pub category: Option<TaskCategory>,
    /// Contacts picked as assignees, in pick order.
    pub assigned: Vec<ContactId>,
    /// Subtask titles added so far.
    pub subtasks: Vec<String>,
    /// Text of the subtask currently being typed.
    pub subtask_input: String,
    /// Field with input focus.
    pub focus: AddTaskField,
    /// Cursor in the assignee picker.
    pub assignee_cursor: usize,
}

impl AddTaskForm {
    /// The effective priority; `Medium` until the user picks one.
    #[must_use]
    pub fn priority(&self) -> TaskPriority {
        self.priority.unwrap_or(TaskPriority::Medium)
    }

    /// Move focus to the next field, wrapping around.
    pub const fn focus_next(&mut self) {
        self.focus = match self.focus {
            AddTaskField::Title => AddTaskField::Description,
            AddTaskField::Description => AddTaskField::DueDate,
            AddTaskField::DueDate => AddTaskField::Priority,
            AddTaskField::Priority => AddTaskField::Category,
            AddTaskField::Category => AddTaskField::Assignees,
            AddTaskField::Assignees => AddTaskField::Subtasks,
            AddTaskField::Subtasks => AddTaskField::Title,
        };
    }

    /// Toggle a contact in the assignee set.
    pub fn toggle_assignee(&mut self, id: ContactId) {
        if let Some(pos) = self.assigned.iter().position(|a| *a == id) {
            self.assigned.remove(pos);
        } else {
            self.assigned.push(id);
        }
    }

    /// Whether a contact is currently picked.
    #[must_use]
    pub fn is_assigned(&self, id: ContactId) -> bool {
        self.assigned.contains(&id)
    }

    /// Commit the subtask input as a new checklist item.
    ///
    /// Blank input is ignored.
    pub fn commit_subtask(&mut self) {
        let title = self.subtask_input.trim();
        if !title.is_empty() {
            self.subtasks.push(title.to_string());
        }
        self.subtask_input.clear();
    }

    /// Remove a previously added subtask by index.
    pub fn remove_subtask(&mut self, index: usize) {
        if index < self.subtasks.len() {
            self.subtasks.remove(index);
        }
    }

    /// Validate the form and build the creation payload.
    ///
    /// `today` anchors the past-date check.
    ///
    /// # Errors
    ///
    /// Returns every failed check, in field order.
    pub fn validate(&self, today: NaiveDate) -> Result<TaskDraft, Vec<TaskFormError>> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push(TaskFormError::TitleRequired);
        }

        let date_input = self.due_date.trim();
        let due_date = if date_input.is_empty() {
            errors.push(TaskFormError::DateRequired);
            None
        } else {
            match NaiveDate::parse_from_str(date_input, DATE_FORMAT) {
                Ok(date) if date < today => {
                    errors.push(TaskFormError::DatePast);
                    None
                }
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push(TaskFormError::DateInvalid);
                    None
                }
            }
        };

        if self.category.is_none() {
            errors.push(TaskFormError::CategoryRequired);
        }

        let (Some(due_date), Some(category), true) = (due_date, self.category, errors.is_empty())
        else {
            return Err(errors);
        };

        let description = self.description.trim();
        Ok(TaskDraft {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            due_date,
            priority: self.priority(),
            category,
            assigned_contact_ids: self.assigned.clone(),
            subtask_titles: self.subtasks.clone(),
        })
    }

    /// Reset all fields for the next task.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
