//! Reactive data store synchronized with the hub.
//!
//! [`SyncStore`] holds the two shared collections — contacts and tasks —
//! in [`tokio::sync::watch`] channels so views can observe them. Mutations
//! go to the backend and then refetch the affected collection wholesale;
//! the store never patches a collection in place from a mutation result.
//! A [`ChangeFeed`] keeps the collections fresh when *other* clients
//! mutate, again by refetching rather than diffing.

pub mod columns;

use std::sync::Arc;

use taskdeck_proto::contact::{Contact, ContactId, ContactPatch, NewContact};
use taskdeck_proto::task::{FullTask, SubtaskId, TaskDraft, TaskId, TaskStatus};
use tokio::sync::watch;

use crate::backend::{Backend, BackendError};
use columns::BoardColumns;

/// Reactive store over a [`Backend`].
///
/// Cheap to clone; clones share the same collections and backend.
pub struct SyncStore<B> {
    backend: Arc<B>,
    contacts: watch::Sender<Vec<Contact>>,
    tasks: watch::Sender<Vec<FullTask>>,
}

impl<B> Clone for SyncStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            contacts: self.contacts.clone(),
            tasks: self.tasks.clone(),
        }
    }
}

impl<B: Backend + 'static> SyncStore<B> {
    /// Creates a store with empty collections. Call
    /// [`refresh_all`](Self::refresh_all) to populate them.
    #[must_use]
    pub fn new(backend: Arc<B>) -> Self {
        let (contacts, _) = watch::channel(Vec::new());
        let (tasks, _) = watch::channel(Vec::new());
        Self {
            backend,
            contacts,
            tasks,
        }
    }

    /// The backend this store talks to.
    #[must_use]
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Observe the contact collection.
    #[must_use]
    pub fn contacts(&self) -> watch::Receiver<Vec<Contact>> {
        self.contacts.subscribe()
    }

    /// Observe the task collection.
    #[must_use]
    pub fn tasks(&self) -> watch::Receiver<Vec<FullTask>> {
        self.tasks.subscribe()
    }

    /// Current contacts, cloned out of the watch channel.
    #[must_use]
    pub fn contacts_snapshot(&self) -> Vec<Contact> {
        self.contacts.borrow().clone()
    }

    /// Current tasks, cloned out of the watch channel.
    #[must_use]
    pub fn tasks_snapshot(&self) -> Vec<FullTask> {
        self.tasks.borrow().clone()
    }

    /// The current task collection partitioned into board columns.
    #[must_use]
    pub fn board(&self) -> BoardColumns {
        BoardColumns::partition(&self.tasks.borrow())
    }

    /// Refetch the contact collection from the backend.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the fetch fails; the collection keeps
    /// its previous value in that case.
    pub async fn refresh_contacts(&self) -> Result<(), BackendError> {
        let contacts = self.backend.list_contacts().await?;
        self.contacts.send_replace(contacts);
        Ok(())
    }

    /// Refetch the task collection from the backend.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the fetch fails; the collection keeps
    /// its previous value in that case.
    pub async fn refresh_tasks(&self) -> Result<(), BackendError> {
        let tasks = self.backend.list_tasks().await?;
        self.tasks.send_replace(tasks);
        Ok(())
    }

    /// Refetch both collections.
    ///
    /// # Errors
    ///
    /// Returns the first [`BackendError`] encountered.
    pub async fn refresh_all(&self) -> Result<(), BackendError> {
        self.refresh_contacts().await?;
        self.refresh_tasks().await
    }

    /// Point lookup of a contact.
    ///
    /// Returns `None` both when the id is unknown and when the backend
    /// call fails; failures are logged, never surfaced. Callers treat a
    /// missing contact and an unreachable hub the same way.
    pub async fn contact_by_id(&self, id: ContactId) -> Option<Contact> {
        match self.backend.get_contact(id).await {
            Ok(contact) => contact,
            Err(e) => {
                tracing::warn!(contact_id = %id, err = %e, "contact lookup failed");
                None
            }
        }
    }

    /// Create a contact, then refetch the contact collection.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the insert or the refetch fails.
    pub async fn create_contact(&self, contact: NewContact) -> Result<(), BackendError> {
        self.backend.insert_contact(contact).await?;
        self.refresh_contacts().await
    }

    /// Update a contact, then refetch the contact collection.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the update or the refetch fails.
    pub async fn update_contact(
        &self,
        id: ContactId,
        patch: ContactPatch,
    ) -> Result<(), BackendError> {
        self.backend.update_contact(id, patch).await?;
        self.refresh_contacts().await
    }

    /// Delete a contact, then refetch the contact collection.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the delete or the refetch fails.
    pub async fn delete_contact(&self, id: ContactId) -> Result<(), BackendError> {
        self.backend.delete_contact(id).await?;
        self.refresh_contacts().await
    }

    /// Create a task, then refetch the task collection.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the insert or the refetch fails.
    pub async fn create_task(&self, draft: TaskDraft) -> Result<(), BackendError> {
        self.backend.insert_task(draft).await?;
        self.refresh_tasks().await
    }

    /// Move a task to another workflow stage, then refetch the tasks.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the move or the refetch fails.
    pub async fn move_task(&self, id: TaskId, status: TaskStatus) -> Result<(), BackendError> {
        self.backend.update_task_status(id, status).await?;
        self.refresh_tasks().await
    }

    /// Delete a task, then refetch the task collection.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the delete or the refetch fails.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), BackendError> {
        self.backend.delete_task(id).await?;
        self.refresh_tasks().await
    }

    /// Set a subtask's completion flag, then refetch the task collection.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the flip or the refetch fails.
    pub async fn toggle_subtask(&self, id: SubtaskId, is_done: bool) -> Result<(), BackendError> {
        self.backend.set_subtask_done(id, is_done).await?;
        self.refresh_tasks().await
    }

    /// Subscribe to the hub's change feed and keep the collections fresh.
    ///
    /// Any event, regardless of which table changed, refetches both
    /// collections. The returned [`ChangeFeed`] owns the background task:
    /// dropping or disposing it stops the feed. Calling `watch_changes`
    /// again replaces the hub-side subscription, so the old feed stops
    /// receiving events.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if subscribing fails.
    pub async fn watch_changes(&self) -> Result<ChangeFeed, BackendError> {
        let mut events = self.backend.subscribe().await?;
        let store = self.clone();
        let handle = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                tracing::debug!(table = %event.table, op = ?event.op, "change event, refetching");
                if let Err(e) = store.refresh_contacts().await {
                    tracing::warn!(err = %e, "contact refetch after change failed");
                }
                if let Err(e) = store.refresh_tasks().await {
                    tracing::warn!(err = %e, "task refetch after change failed");
                }
            }
            tracing::debug!("change feed ended");
        });
        Ok(ChangeFeed { handle })
    }
}

/// Handle to a running change-feed task.
///
/// The feed stops when the handle is disposed or dropped, so holding it
/// scopes the subscription to the owner's lifetime.
#[derive(Debug)]
pub struct ChangeFeed {
    handle: tokio::task::JoinHandle<()>,
}

impl ChangeFeed {
    /// Stop the feed explicitly.
    pub fn dispose(self) {
        self.handle.abort();
    }

    /// Whether the feed task has already ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ChangeFeed {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
