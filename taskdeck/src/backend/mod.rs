//! Backend abstraction for `TaskDeck`.
//!
//! Defines the [`Backend`] trait that the sync store talks to. The one
//! production implementation is [`hub::HubBackend`], a WebSocket client
//! for the `taskdeck-hub` service; tests substitute their own mock.

pub mod hub;

use std::future::Future;

use taskdeck_proto::api::ChangeEvent;
use taskdeck_proto::codec::CodecError;
use taskdeck_proto::contact::{Contact, ContactId, ContactPatch, NewContact};
use taskdeck_proto::task::{FullTask, SubtaskId, TaskDraft, TaskId, TaskStatus};
use tokio::sync::mpsc;

/// Errors that can occur during backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The connection to the hub has been closed.
    #[error("connection closed")]
    ConnectionClosed,

    /// Connecting to the hub timed out.
    #[error("hub connect timed out")]
    ConnectTimeout,

    /// The hub rejected the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The hub answered with a response of the wrong shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// A frame could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// An underlying I/O error occurred.
    #[error("backend I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Async CRUD and change-feed interface to the data service.
///
/// Mutations return `Ok(())` once the hub has accepted them; they do not
/// carry the new row back. Callers are expected to refetch the affected
/// collection afterwards, which is what [`crate::store::SyncStore`] does.
pub trait Backend: Send + Sync {
    /// Fetch all contacts, ordered by name ascending.
    fn list_contacts(&self) -> impl Future<Output = Result<Vec<Contact>, BackendError>> + Send;

    /// Point lookup of a single contact. `Ok(None)` when the id is unknown.
    fn get_contact(
        &self,
        id: ContactId,
    ) -> impl Future<Output = Result<Option<Contact>, BackendError>> + Send;

    /// Insert a new contact.
    fn insert_contact(
        &self,
        contact: NewContact,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Apply a partial update to a contact.
    fn update_contact(
        &self,
        id: ContactId,
        patch: ContactPatch,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Delete a contact and its task assignments.
    fn delete_contact(&self, id: ContactId)
    -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Fetch all tasks joined with subtasks and assigned contacts.
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<FullTask>, BackendError>> + Send;

    /// Insert a new task with its initial subtasks and assignments.
    fn insert_task(&self, draft: TaskDraft)
    -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Move a task to a different workflow stage.
    fn update_task_status(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Delete a task, cascading to its subtasks and assignments.
    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Set a subtask's completion flag.
    fn set_subtask_done(
        &self,
        id: SubtaskId,
        is_done: bool,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Start receiving change events on a fresh channel.
    ///
    /// Calling `subscribe` again replaces the previous channel, so at most
    /// one receiver is fed at a time.
    fn subscribe(
        &self,
    ) -> impl Future<Output = Result<mpsc::Receiver<ChangeEvent>, BackendError>> + Send;

    /// Whether the connection to the data service is currently up.
    fn is_connected(&self) -> bool;
}
