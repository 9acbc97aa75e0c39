//! RPC frames exchanged between the `TaskDeck` client and the data hub.
//!
//! The protocol is a thin request/response layer plus a change-notification
//! stream, both multiplexed over one WebSocket connection. Requests carry a
//! [`RequestId`] so responses can be correlated out of order; change events
//! are unsolicited and arrive only after the client sends
//! [`ClientFrame::Subscribe`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::{self, CodecError};
use crate::contact::{ContactId, ContactPatch, NewContact};
use crate::task::{SubtaskId, TaskDraft, TaskId, TaskStatus};

/// Correlation id for a request, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new time-ordered request identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which hub table a change event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Table {
    /// The contacts table.
    Contacts,
    /// The tasks table.
    Tasks,
    /// The subtasks table.
    Subtasks,
    /// The task-to-contact assignment join table.
    TaskAssignments,
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contacts => write!(f, "contacts"),
            Self::Tasks => write!(f, "tasks"),
            Self::Subtasks => write!(f, "subtasks"),
            Self::TaskAssignments => write!(f, "task_assignments"),
        }
    }
}

/// Kind of row mutation a change event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeOp {
    /// One or more rows were inserted.
    Insert,
    /// One or more rows were updated.
    Update,
    /// One or more rows were deleted.
    Delete,
}

/// A row-change notification broadcast to every subscribed connection.
///
/// Events carry no row data: subscribers are expected to refetch the
/// affected collections wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Which table changed.
    pub table: Table,
    /// What kind of mutation happened.
    pub op: ChangeOp,
}

/// A CRUD operation against the hub's tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiRequest {
    /// Fetch all contacts, ordered by name ascending.
    ListContacts,
    /// Point lookup of a single contact.
    GetContact {
        /// Contact to fetch.
        id: ContactId,
    },
    /// Insert a new contact.
    InsertContact {
        /// The insert payload.
        contact: NewContact,
    },
    /// Apply a partial update to a contact.
    UpdateContact {
        /// Contact to update.
        id: ContactId,
        /// Fields to change.
        patch: ContactPatch,
    },
    /// Delete a contact and its task assignments.
    DeleteContact {
        /// Contact to delete.
        id: ContactId,
    },
    /// Fetch all tasks joined with subtasks and assigned contacts.
    ListTasks,
    /// Insert a new task with its initial subtasks and assignments.
    InsertTask {
        /// The creation payload.
        draft: TaskDraft,
    },
    /// Move a task to a different workflow stage.
    UpdateTaskStatus {
        /// Task to move.
        id: TaskId,
        /// New workflow stage.
        status: TaskStatus,
    },
    /// Delete a task, cascading to its subtasks and assignments.
    DeleteTask {
        /// Task to delete.
        id: TaskId,
    },
    /// Set a subtask's completion flag.
    SetSubtaskDone {
        /// Subtask to flip.
        id: SubtaskId,
        /// New completion flag.
        is_done: bool,
    },
}

/// The hub's answer to an [`ApiRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiResponse {
    /// Contact listing, ordered by name ascending.
    Contacts(Vec<crate::contact::Contact>),
    /// Point lookup result; `None` when the id does not exist.
    Contact(Option<crate::contact::Contact>),
    /// Joined task listing.
    Tasks(Vec<crate::task::FullTask>),
    /// Mutation accepted.
    Ack,
    /// Request rejected (unknown id, malformed payload).
    Error {
        /// Human-readable reason.
        reason: String,
    },
}

/// Frames sent from the client to the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientFrame {
    /// A correlated CRUD request.
    Request {
        /// Correlation id, echoed back in the response.
        id: RequestId,
        /// The operation to perform.
        request: ApiRequest,
    },
    /// Start receiving [`ChangeEvent`]s on this connection.
    Subscribe,
    /// Stop receiving [`ChangeEvent`]s on this connection.
    Unsubscribe,
}

/// Frames sent from the hub to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerFrame {
    /// Answer to a [`ClientFrame::Request`].
    Response {
        /// Correlation id of the request being answered.
        id: RequestId,
        /// The result.
        response: ApiResponse,
    },
    /// Unsolicited row-change notification.
    Change(ChangeEvent),
}

/// Encodes a [`ClientFrame`] into bytes using postcard.
///
/// # Errors
///
/// Returns [`CodecError`] if serialization fails.
pub fn encode_client(frame: &ClientFrame) -> Result<Vec<u8>, CodecError> {
    codec::encode(frame)
}

/// Decodes a [`ClientFrame`] from bytes using postcard.
///
/// # Errors
///
/// Returns [`CodecError`] if deserialization fails.
pub fn decode_client(bytes: &[u8]) -> Result<ClientFrame, CodecError> {
    codec::decode(bytes)
}

/// Encodes a [`ServerFrame`] into bytes using postcard.
///
/// # Errors
///
/// Returns [`CodecError`] if serialization fails.
pub fn encode_server(frame: &ServerFrame) -> Result<Vec<u8>, CodecError> {
    codec::encode(frame)
}

/// Decodes a [`ServerFrame`] from bytes using postcard.
///
/// # Errors
///
/// Returns [`CodecError`] if deserialization fails.
pub fn decode_server(bytes: &[u8]) -> Result<ServerFrame, CodecError> {
    codec::decode(bytes)
}
