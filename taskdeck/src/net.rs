//! Sync coordinator for wiring the TUI to the async data layer.
//!
//! This module bridges the synchronous TUI event loop (crossterm
//! poll-based) with the async [`SyncStore`] / [`HubBackend`] stack. It
//! spawns background tokio tasks and communicates with the main thread
//! via [`StoreCommand`] / [`StoreEvent`] channels.
//!
//! # Architecture
//!
//! ```text
//! TUI (main thread)  ←── StoreEvent ───  tokio background tasks
//!                     ─── StoreCommand →
//! ```
//!
//! The main thread sends [`StoreCommand`]s (e.g., create a contact) and
//! drains [`StoreEvent`]s (e.g., a collection changed) on each tick of
//! the poll-based event loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use taskdeck_proto::contact::{Contact, ContactId, ContactPatch, NewContact};
use taskdeck_proto::task::{FullTask, SubtaskId, TaskDraft, TaskId, TaskStatus};

use crate::backend::Backend;
use crate::backend::hub::HubBackend;
use crate::store::{ChangeFeed, SyncStore};

/// Commands sent from the TUI main loop to the sync background tasks.
#[derive(Debug)]
pub enum StoreCommand {
    /// Create a contact.
    CreateContact(NewContact),
    /// Apply a partial update to a contact.
    UpdateContact {
        /// The contact to update.
        id: ContactId,
        /// The fields to change.
        patch: ContactPatch,
    },
    /// Delete a contact and its task assignments.
    DeleteContact(ContactId),
    /// Create a task with its subtasks and assignments.
    CreateTask(TaskDraft),
    /// Move a task to another workflow stage.
    MoveTask {
        /// The task to move.
        id: TaskId,
        /// The target stage.
        status: TaskStatus,
    },
    /// Delete a task and everything attached to it.
    DeleteTask(TaskId),
    /// Set a subtask's completion flag.
    ToggleSubtask {
        /// The subtask to flip.
        id: SubtaskId,
        /// The new completion state.
        is_done: bool,
    },
    /// Refetch both collections.
    Refresh,
    /// Gracefully shut down the sync tasks.
    Shutdown,
}

/// Events sent from the sync background tasks to the TUI main loop.
#[derive(Debug)]
pub enum StoreEvent {
    /// The contact collection changed; here is the new snapshot.
    ContactsUpdated(Vec<Contact>),
    /// The task collection changed; here is the new snapshot.
    TasksUpdated(Vec<FullTask>),
    /// Connection status update.
    ConnectionStatus {
        /// Whether currently connected to the hub.
        connected: bool,
    },
    /// An error occurred in the sync layer.
    Error(String),
}

/// Configuration for the sync layer.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// WebSocket URL of the hub (e.g., `ws://127.0.0.1:7420/ws`).
    pub hub_url: String,
    /// Channel capacity for the command/event mpsc channels.
    pub channel_capacity: usize,
    /// How long to wait for the initial connection.
    pub connect_timeout: Duration,
}

/// Default channel capacity for commands and events.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Default timeout for the initial hub connection.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

impl SyncConfig {
    /// Creates a `SyncConfig` with default capacity and timeout.
    #[must_use]
    pub const fn new(hub_url: String) -> Self {
        Self {
            hub_url,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Spawn the sync background tasks and return channel handles.
///
/// This connects to the hub, builds a [`SyncStore`], subscribes to the
/// change feed, and spawns:
///
/// 1. Two **snapshot forwarders** that watch the store's collections and
///    send [`StoreEvent::ContactsUpdated`] / [`StoreEvent::TasksUpdated`]
///    whenever one changes.
/// 2. A **command handler** that performs the initial load, then applies
///    [`StoreCommand`]s against the store. It owns the change feed, so
///    shutting it down also ends the subscription.
///
/// # Errors
///
/// Returns an error string if connecting or subscribing fails. The
/// caller should surface it and exit.
pub async fn spawn_sync(
    config: SyncConfig,
) -> Result<(mpsc::Sender<StoreCommand>, mpsc::Receiver<StoreEvent>), String> {
    let backend = HubBackend::connect_with_timeout(&config.hub_url, config.connect_timeout)
        .await
        .map_err(|e| format!("hub connection failed: {e}"))?;
    let store = SyncStore::new(Arc::new(backend));

    let feed = store
        .watch_changes()
        .await
        .map_err(|e| format!("change subscription failed: {e}"))?;

    let (cmd_tx, cmd_rx) = mpsc::channel::<StoreCommand>(config.channel_capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<StoreEvent>(config.channel_capacity);

    let _ = evt_tx.send(StoreEvent::ConnectionStatus { connected: true }).await;

    // Forwarders subscribe before the initial load so the first refetch
    // already flows through them.
    let contacts_rx = store.contacts();
    let contacts_evt_tx = evt_tx.clone();
    tokio::spawn(async move {
        forward_contacts(contacts_rx, contacts_evt_tx).await;
    });

    let tasks_rx = store.tasks();
    let tasks_evt_tx = evt_tx.clone();
    tokio::spawn(async move {
        forward_tasks(tasks_rx, tasks_evt_tx).await;
    });

    tokio::spawn(async move {
        command_handler(store, cmd_rx, evt_tx, feed).await;
    });

    Ok((cmd_tx, evt_rx))
}

/// Background task: forward contact snapshots to the TUI.
async fn forward_contacts(
    mut rx: tokio::sync::watch::Receiver<Vec<Contact>>,
    evt_tx: mpsc::Sender<StoreEvent>,
) {
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        if evt_tx
            .send(StoreEvent::ContactsUpdated(snapshot))
            .await
            .is_err()
        {
            // TUI dropped; exit.
            break;
        }
    }
}

/// Background task: forward task snapshots to the TUI.
async fn forward_tasks(
    mut rx: tokio::sync::watch::Receiver<Vec<FullTask>>,
    evt_tx: mpsc::Sender<StoreEvent>,
) {
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        if evt_tx
            .send(StoreEvent::TasksUpdated(snapshot))
            .await
            .is_err()
        {
            break;
        }
    }
}

/// Background task: perform the initial load, then apply commands.
///
/// Holds the [`ChangeFeed`] so the hub-side subscription lives exactly
/// as long as the command loop.
async fn command_handler(
    store: SyncStore<HubBackend>,
    mut cmd_rx: mpsc::Receiver<StoreCommand>,
    evt_tx: mpsc::Sender<StoreEvent>,
    _feed: ChangeFeed,
) {
    if let Err(e) = store.refresh_all().await {
        let _ = evt_tx
            .send(StoreEvent::Error(format!("initial load failed: {e}")))
            .await;
    }

    while let Some(cmd) = cmd_rx.recv().await {
        let result = match cmd {
            StoreCommand::CreateContact(contact) => store.create_contact(contact).await,
            StoreCommand::UpdateContact { id, patch } => store.update_contact(id, patch).await,
            StoreCommand::DeleteContact(id) => store.delete_contact(id).await,
            StoreCommand::CreateTask(draft) => store.create_task(draft).await,
            StoreCommand::MoveTask { id, status } => store.move_task(id, status).await,
            StoreCommand::DeleteTask(id) => store.delete_task(id).await,
            StoreCommand::ToggleSubtask { id, is_done } => {
                store.toggle_subtask(id, is_done).await
            }
            StoreCommand::Refresh => store.refresh_all().await,
            StoreCommand::Shutdown => {
                tracing::info!("sync command handler shutting down");
                break;
            }
        };

        if let Err(e) = result {
            tracing::warn!(err = %e, "store command failed");
            let _ = evt_tx.send(StoreEvent::Error(e.to_string())).await;
            if !store.backend().is_connected() {
                let _ = evt_tx
                    .send(StoreEvent::ConnectionStatus { connected: false })
                    .await;
            }
        }
    }
}
