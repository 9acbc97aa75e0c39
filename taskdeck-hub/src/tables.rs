//! In-memory relational tables backing the hub.
//!
//! [`Tables`] is a plain synchronous engine: every [`ApiRequest`] maps to
//! one [`apply`](Tables::apply) call that returns the response plus the
//! change events the mutation produced. Locking and broadcasting live in
//! [`crate::hub`]; this module never touches the network.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use taskdeck_proto::api::{ApiRequest, ApiResponse, ChangeEvent, ChangeOp, Table};
use taskdeck_proto::contact::{Contact, ContactId, ContactPatch, NewContact};
use taskdeck_proto::task::{
    AssignedContact, FullTask, Subtask, SubtaskId, Task, TaskDraft, TaskId, TaskStatus,
};

/// The hub's tables: contacts, tasks, subtasks, and the task-to-contact
/// assignment join table.
///
/// All row ids come from one shared sequence, so ids are unique across
/// tables as well as within them.
#[derive(Debug, Default)]
pub struct Tables {
    next_id: i64,
    contacts: BTreeMap<ContactId, Contact>,
    tasks: BTreeMap<TaskId, Task>,
    subtasks: BTreeMap<SubtaskId, Subtask>,
    /// `(task, contact)` pairs in assignment order.
    assignments: Vec<(TaskId, ContactId)>,
}

impl Tables {
    /// Creates an empty set of tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Applies a request against the tables.
    ///
    /// Returns the response to send back to the caller and the change
    /// events to broadcast to every subscriber. Rejected requests return
    /// [`ApiResponse::Error`] and produce no events.
    pub fn apply(&mut self, request: ApiRequest, now: DateTime<Utc>) -> (ApiResponse, Vec<ChangeEvent>) {
        match request {
            ApiRequest::ListContacts => (ApiResponse::Contacts(self.list_contacts()), vec![]),
            ApiRequest::GetContact { id } => {
                (ApiResponse::Contact(self.contacts.get(&id).cloned()), vec![])
            }
            ApiRequest::InsertContact { contact } => self.insert_contact(contact, now),
            ApiRequest::UpdateContact { id, patch } => self.update_contact(id, &patch),
            ApiRequest::DeleteContact { id } => self.delete_contact(id),
            ApiRequest::ListTasks => (ApiResponse::Tasks(self.list_tasks()), vec![]),
            ApiRequest::InsertTask { draft } => self.insert_task(draft, now),
            ApiRequest::UpdateTaskStatus { id, status } => self.update_task_status(id, status),
            ApiRequest::DeleteTask { id } => self.delete_task(id),
            ApiRequest::SetSubtaskDone { id, is_done } => self.set_subtask_done(id, is_done),
        }
    }

    /// All contacts ordered by name ascending (case-insensitive), ties
    /// broken by id.
    fn list_contacts(&self) -> Vec<Contact> {
        let mut contacts: Vec<Contact> = self.contacts.values().cloned().collect();
        contacts.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.id.cmp(&b.id))
        });
        contacts
    }

    fn insert_contact(
        &mut self,
        new: NewContact,
        now: DateTime<Utc>,
    ) -> (ApiResponse, Vec<ChangeEvent>) {
        let id = ContactId(self.next_id());
        self.contacts.insert(
            id,
            Contact {
                id,
                name: new.name,
                email: new.email,
                phone: new.phone,
                color: new.color,
                created_at: now,
            },
        );
        (
            ApiResponse::Ack,
            vec![ChangeEvent {
                table: Table::Contacts,
                op: ChangeOp::Insert,
            }],
        )
    }

    fn update_contact(
        &mut self,
        id: ContactId,
        patch: &ContactPatch,
    ) -> (ApiResponse, Vec<ChangeEvent>) {
        let Some(contact) = self.contacts.get_mut(&id) else {
            return (
                ApiResponse::Error {
                    reason: format!("contact {id} not found"),
                },
                vec![],
            );
        };
        if let Some(name) = patch.name.clone() {
            contact.name = name;
        }
        if let Some(email) = patch.email.clone() {
            contact.email = email;
        }
        if let Some(phone) = patch.phone.clone() {
            contact.phone = phone;
        }
        if let Some(color) = patch.color.clone() {
            contact.color = color;
        }
        (
            ApiResponse::Ack,
            vec![ChangeEvent {
                table: Table::Contacts,
                op: ChangeOp::Update,
            }],
        )
    }

    fn delete_contact(&mut self, id: ContactId) -> (ApiResponse, Vec<ChangeEvent>) {
        if self.contacts.remove(&id).is_none() {
            return (
                ApiResponse::Error {
                    reason: format!("contact {id} not found"),
                },
                vec![],
            );
        }
        let before = self.assignments.len();
        self.assignments.retain(|(_, contact_id)| *contact_id != id);
        let mut events = vec![ChangeEvent {
            table: Table::Contacts,
            op: ChangeOp::Delete,
        }];
        if self.assignments.len() != before {
            events.push(ChangeEvent {
                table: Table::TaskAssignments,
                op: ChangeOp::Delete,
            });
        }
        (ApiResponse::Ack, events)
    }

    /// All tasks joined with their subtasks and assigned contacts, ordered
    /// by insertion.
    fn list_tasks(&self) -> Vec<FullTask> {
        self.tasks
            .values()
            .map(|task| FullTask {
                task: task.clone(),
                subtasks: self
                    .subtasks
                    .values()
                    .filter(|s| s.task_id == task.id)
                    .cloned()
                    .collect(),
                assignees: self
                    .assignments
                    .iter()
                    .filter(|(task_id, _)| *task_id == task.id)
                    .filter_map(|(_, contact_id)| self.contacts.get(contact_id))
                    .map(|c| AssignedContact {
                        id: c.id,
                        name: c.name.clone(),
                        color: c.color.clone(),
                        email: c.email.clone(),
                    })
                    .collect(),
            })
            .collect()
    }

    fn insert_task(&mut self, draft: TaskDraft, now: DateTime<Utc>) -> (ApiResponse, Vec<ChangeEvent>) {
        if let Some(unknown) = draft
            .assigned_contact_ids
            .iter()
            .find(|id| !self.contacts.contains_key(id))
        {
            return (
                ApiResponse::Error {
                    reason: format!("contact {unknown} not found"),
                },
                vec![],
            );
        }

        let id = TaskId(self.next_id());
        self.tasks.insert(
            id,
            Task {
                id,
                title: draft.title,
                description: draft.description,
                due_date: draft.due_date,
                priority: draft.priority,
                category: draft.category,
                status: TaskStatus::ToDo,
                created_at: now,
            },
        );
        let mut events = vec![ChangeEvent {
            table: Table::Tasks,
            op: ChangeOp::Insert,
        }];

        if !draft.subtask_titles.is_empty() {
            for title in draft.subtask_titles {
                let subtask_id = SubtaskId(self.next_id());
                self.subtasks.insert(
                    subtask_id,
                    Subtask {
                        id: subtask_id,
                        task_id: id,
                        title,
                        is_done: false,
                    },
                );
            }
            events.push(ChangeEvent {
                table: Table::Subtasks,
                op: ChangeOp::Insert,
            });
        }

        if !draft.assigned_contact_ids.is_empty() {
            for contact_id in draft.assigned_contact_ids {
                self.assignments.push((id, contact_id));
            }
            events.push(ChangeEvent {
                table: Table::TaskAssignments,
                op: ChangeOp::Insert,
            });
        }

        (ApiResponse::Ack, events)
    }

    fn update_task_status(
        &mut self,
        id: TaskId,
        status: TaskStatus,
    ) -> (ApiResponse, Vec<ChangeEvent>) {
        let Some(task) = self.tasks.get_mut(&id) else {
            return (
                ApiResponse::Error {
                    reason: format!("task {id} not found"),
                },
                vec![],
            );
        };
        task.status = status;
        (
            ApiResponse::Ack,
            vec![ChangeEvent {
                table: Table::Tasks,
                op: ChangeOp::Update,
            }],
        )
    }

    fn delete_task(&mut self, id: TaskId) -> (ApiResponse, Vec<ChangeEvent>) {
        if self.tasks.remove(&id).is_none() {
            return (
                ApiResponse::Error {
                    reason: format!("task {id} not found"),
                },
                vec![],
            );
        }
        let mut events = vec![ChangeEvent {
            table: Table::Tasks,
            op: ChangeOp::Delete,
        }];

        let subtasks_before = self.subtasks.len();
        self.subtasks.retain(|_, s| s.task_id != id);
        if self.subtasks.len() != subtasks_before {
            events.push(ChangeEvent {
                table: Table::Subtasks,
                op: ChangeOp::Delete,
            });
        }

        let assignments_before = self.assignments.len();
        self.assignments.retain(|(task_id, _)| *task_id != id);
        if self.assignments.len() != assignments_before {
            events.push(ChangeEvent {
                table: Table::TaskAssignments,
                op: ChangeOp::Delete,
            });
        }

        (ApiResponse::Ack, events)
    }

    fn set_subtask_done(&mut self, id: SubtaskId, is_done: bool) -> (ApiResponse, Vec<ChangeEvent>) {
        let Some(subtask) = self.subtasks.get_mut(&id) else {
            return (
                ApiResponse::Error {
                    reason: format!("subtask {id} not found"),
                },
                vec![],
            );
        };
        subtask.is_done = is_done;
        (
            ApiResponse::Ack,
            vec![ChangeEvent {
                table: Table::Subtasks,
                op: ChangeOp::Update,
            }],
        )
    }
}
