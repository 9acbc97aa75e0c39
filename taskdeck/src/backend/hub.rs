//! WebSocket client for the `taskdeck-hub` data service.
//!
//! Implements the [`Backend`] trait over one WebSocket connection.
//! Requests are correlated by [`RequestId`]; a background reader task
//! resolves pending requests and forwards change events to the current
//! subscription channel.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use taskdeck_proto::api::{self, ApiRequest, ApiResponse, ChangeEvent, ClientFrame, RequestId, ServerFrame};
use taskdeck_proto::contact::{Contact, ContactId, ContactPatch, NewContact};
use taskdeck_proto::task::{FullTask, SubtaskId, TaskDraft, TaskId, TaskStatus};

use super::{Backend, BackendError};

/// Type alias for the write half of a WebSocket connection.
type WsSender = futures_util::stream::SplitSink<
    WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
    Message,
>;

/// Type alias for the read half of a WebSocket connection.
type WsReader =
    futures_util::stream::SplitStream<WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>>;

/// Requests awaiting a response, keyed by correlation id.
type PendingMap = Arc<Mutex<HashMap<RequestId, oneshot::Sender<ApiResponse>>>>;

/// Slot for the current change-event subscription channel.
type ChangeSlot = Arc<Mutex<Option<mpsc::Sender<ChangeEvent>>>>;

/// Default timeout for connecting to the hub.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Buffer size for the change-event channel handed out by `subscribe`.
const CHANGE_BUFFER: usize = 64;

/// WebSocket backend implementing the [`Backend`] trait.
///
/// Created via [`HubBackend::connect`], which establishes the WebSocket
/// connection and spawns a background reader task. Requests carry no
/// response deadline: a pending request resolves when the hub answers or
/// fails with [`BackendError::ConnectionClosed`] when the connection dies.
pub struct HubBackend {
    /// The hub WebSocket URL (ws:// or wss://).
    hub_url: String,
    /// Write half of the WebSocket connection (shared for concurrent sends).
    ws_sender: Arc<tokio::sync::Mutex<WsSender>>,
    /// Requests awaiting their correlated response.
    pending: PendingMap,
    /// Current change-event subscription, replaced on each `subscribe`.
    change_tx: ChangeSlot,
    /// Whether the WebSocket connection to the hub is active.
    connected: Arc<AtomicBool>,
    /// Handle to the background reader task (kept alive for the backend's lifetime).
    _reader_handle: tokio::task::JoinHandle<()>,
}

impl HubBackend {
    /// Connect to a hub with the default connect timeout.
    ///
    /// # Errors
    ///
    /// See [`HubBackend::connect_with_timeout`].
    pub async fn connect(hub_url: &str) -> Result<Self, BackendError> {
        Self::connect_with_timeout(hub_url, DEFAULT_CONNECT_TIMEOUT).await
    }

    /// Connect to a hub, establishing the WebSocket connection and spawning
    /// the background reader task.
    ///
    /// # Errors
    ///
    /// - [`BackendError::ConnectTimeout`] if the connection does not come up
    ///   within `connect_timeout`.
    /// - [`BackendError::Io`] if the hub cannot be reached.
    pub async fn connect_with_timeout(
        hub_url: &str,
        connect_timeout: Duration,
    ) -> Result<Self, BackendError> {
        let (ws_stream, _response) = tokio::time::timeout(connect_timeout, connect_async(hub_url))
            .await
            .map_err(|_| {
                tracing::warn!(url = hub_url, "hub WebSocket connect timed out");
                BackendError::ConnectTimeout
            })?
            .map_err(|e| {
                tracing::warn!(url = hub_url, err = %e, "hub WebSocket connect failed");
                BackendError::Io(std::io::Error::other(format!("hub connect failed: {e}")))
            })?;

        tracing::info!(url = hub_url, "connected to hub");

        let (ws_sender, ws_reader) = ws_stream.split();

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let change_tx: ChangeSlot = Arc::new(Mutex::new(None));
        let connected = Arc::new(AtomicBool::new(true));

        let reader_handle = tokio::spawn(reader_loop(
            ws_reader,
            Arc::clone(&pending),
            Arc::clone(&change_tx),
            Arc::clone(&connected),
        ));

        Ok(Self {
            hub_url: hub_url.to_string(),
            ws_sender: Arc::new(tokio::sync::Mutex::new(ws_sender)),
            pending,
            change_tx,
            connected,
            _reader_handle: reader_handle,
        })
    }

    /// Return the hub URL this backend is connected to.
    #[must_use]
    pub fn hub_url(&self) -> &str {
        &self.hub_url
    }

    /// Send a request and wait for its correlated response.
    ///
    /// There is deliberately no response deadline: the future resolves when
    /// the hub answers, or fails when the connection goes down (the reader
    /// task drops the pending map, waking all waiters).
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, BackendError> {
        if !self.connected.load(Ordering::Relaxed) {
            return Err(BackendError::ConnectionClosed);
        }

        let id = RequestId::new();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        let frame = ClientFrame::Request { id, request };
        let bytes = api::encode_client(&frame)?;

        {
            let mut sender = self.ws_sender.lock().await;
            if let Err(e) = sender.send(Message::Binary(bytes.into())).await {
                tracing::warn!(request_id = %id, err = %e, "hub send failed");
                self.pending.lock().remove(&id);
                self.connected.store(false, Ordering::Relaxed);
                return Err(BackendError::ConnectionClosed);
            }
        }

        rx.await.map_err(|_| BackendError::ConnectionClosed)
    }

    /// Send a mutation and map the hub's answer to `Ok(())` or an error.
    async fn mutate(&self, request: ApiRequest) -> Result<(), BackendError> {
        match self.request(request).await? {
            ApiResponse::Ack => Ok(()),
            ApiResponse::Error { reason } => Err(BackendError::Rejected(reason)),
            other => Err(BackendError::UnexpectedResponse(format!("{other:?}"))),
        }
    }
}

impl Backend for HubBackend {
    async fn list_contacts(&self) -> Result<Vec<Contact>, BackendError> {
        match self.request(ApiRequest::ListContacts).await? {
            ApiResponse::Contacts(contacts) => Ok(contacts),
            ApiResponse::Error { reason } => Err(BackendError::Rejected(reason)),
            other => Err(BackendError::UnexpectedResponse(format!("{other:?}"))),
        }
    }

    async fn get_contact(&self, id: ContactId) -> Result<Option<Contact>, BackendError> {
        match self.request(ApiRequest::GetContact { id }).await? {
            ApiResponse::Contact(contact) => Ok(contact),
            ApiResponse::Error { reason } => Err(BackendError::Rejected(reason)),
            other => Err(BackendError::UnexpectedResponse(format!("{other:?}"))),
        }
    }

    async fn insert_contact(&self, contact: NewContact) -> Result<(), BackendError> {
        self.mutate(ApiRequest::InsertContact { contact }).await
    }

    async fn update_contact(&self, id: ContactId, patch: ContactPatch) -> Result<(), BackendError> {
        self.mutate(ApiRequest::UpdateContact { id, patch }).await
    }

    async fn delete_contact(&self, id: ContactId) -> Result<(), BackendError> {
        self.mutate(ApiRequest::DeleteContact { id }).await
    }

    async fn list_tasks(&self) -> Result<Vec<FullTask>, BackendError> {
        match self.request(ApiRequest::ListTasks).await? {
            ApiResponse::Tasks(tasks) => Ok(tasks),
            ApiResponse::Error { reason } => Err(BackendError::Rejected(reason)),
            other => Err(BackendError::UnexpectedResponse(format!("{other:?}"))),
        }
    }

    async fn insert_task(&self, draft: TaskDraft) -> Result<(), BackendError> {
        self.mutate(ApiRequest::InsertTask { draft }).await
    }

    async fn update_task_status(&self, id: TaskId, status: TaskStatus) -> Result<(), BackendError> {
        self.mutate(ApiRequest::UpdateTaskStatus { id, status }).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), BackendError> {
        self.mutate(ApiRequest::DeleteTask { id }).await
    }

    async fn set_subtask_done(&self, id: SubtaskId, is_done: bool) -> Result<(), BackendError> {
        self.mutate(ApiRequest::SetSubtaskDone { id, is_done }).await
    }

    /// Open a fresh change-event channel and tell the hub to feed it.
    ///
    /// The previous channel (if any) is dropped, so its receiver sees the
    /// stream end rather than duplicate events.
    async fn subscribe(&self) -> Result<mpsc::Receiver<ChangeEvent>, BackendError> {
        let (tx, rx) = mpsc::channel(CHANGE_BUFFER);
        *self.change_tx.lock() = Some(tx);

        let bytes = api::encode_client(&ClientFrame::Subscribe)?;
        let mut sender = self.ws_sender.lock().await;
        sender.send(Message::Binary(bytes.into())).await.map_err(|e| {
            tracing::warn!(err = %e, "hub subscribe failed");
            self.connected.store(false, Ordering::Relaxed);
            BackendError::ConnectionClosed
        })?;

        Ok(rx)
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

/// Background task that reads WebSocket frames and dispatches them.
///
/// Responses resolve the matching pending request; change events go to the
/// current subscription channel. Malformed frames are logged and skipped —
/// the task does not disconnect on bad data.
///
/// On close or error, sets `connected` to `false` and drops all pending
/// senders so every in-flight request fails with `ConnectionClosed`.
async fn reader_loop(
    mut ws_reader: WsReader,
    pending: PendingMap,
    change_tx: ChangeSlot,
    connected: Arc<AtomicBool>,
) {
    while let Some(msg_result) = ws_reader.next().await {
        match msg_result {
            Ok(Message::Binary(data)) => match api::decode_server(&data) {
                Ok(ServerFrame::Response { id, response }) => {
                    let waiter = pending.lock().remove(&id);
                    if let Some(tx) = waiter {
                        // A closed receiver just means the caller gave up.
                        let _ = tx.send(response);
                    } else {
                        tracing::debug!(request_id = %id, "response for unknown request");
                    }
                }
                Ok(ServerFrame::Change(event)) => {
                    let sender = change_tx.lock().clone();
                    if let Some(tx) = sender {
                        if let Err(e) = tx.try_send(event) {
                            tracing::warn!(err = %e, "change event dropped");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(err = %e, "malformed hub frame, skipping");
                }
            },
            Ok(Message::Close(_)) => {
                tracing::info!("hub WebSocket closed by server");
                break;
            }
            Ok(_) => {
                // Ignore text, ping, pong frames.
            }
            Err(e) => {
                tracing::warn!(err = %e, "hub WebSocket read error");
                break;
            }
        }
    }
    connected.store(false, Ordering::Relaxed);
    pending.lock().clear();
    change_tx.lock().take();
    tracing::info!("hub reader task exiting");
}
