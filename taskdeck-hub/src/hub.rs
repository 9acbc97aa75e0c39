//! Hub server core: shared state, WebSocket handler, and change-event
//! broadcasting.
//!
//! Each connection can issue CRUD requests against the shared [`Tables`]
//! and may subscribe to the change feed. Every mutation broadcasts its
//! change events to all subscribed connections, including the one that
//! issued the request.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::{Message, WebSocket};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use taskdeck_proto::api::{self, ChangeEvent, ClientFrame, ServerFrame};
use tokio::sync::{RwLock, mpsc};

use crate::tables::Tables;

/// Connection identifier, local to one hub process.
type ConnId = u64;

/// Shared hub state holding the tables and the subscriber registry.
pub struct HubState {
    tables: RwLock<Tables>,
    /// Senders for connections that subscribed to the change feed.
    subscribers: RwLock<HashMap<ConnId, mpsc::UnboundedSender<Message>>>,
    next_conn_id: AtomicU64,
}

impl Default for HubState {
    fn default() -> Self {
        Self::new()
    }
}

impl HubState {
    /// Creates a new hub state with empty tables and no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
            subscribers: RwLock::new(HashMap::new()),
            next_conn_id: AtomicU64::new(1),
        }
    }

    fn next_conn_id(&self) -> ConnId {
        self.next_conn_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Adds a connection to the change-feed subscribers.
    ///
    /// Subscribing twice replaces the previous sender, so a connection
    /// never receives an event more than once.
    async fn subscribe(&self, conn_id: ConnId, sender: mpsc::UnboundedSender<Message>) {
        let mut subs = self.subscribers.write().await;
        subs.insert(conn_id, sender);
    }

    /// Removes a connection from the change-feed subscribers.
    async fn unsubscribe(&self, conn_id: ConnId) {
        let mut subs = self.subscribers.write().await;
        subs.remove(&conn_id);
    }

    /// Number of currently subscribed connections.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Broadcasts change events to all subscribed connections.
    ///
    /// Dead senders (whose connection already went away) are pruned.
    async fn broadcast(&self, events: &[ChangeEvent]) {
        if events.is_empty() {
            return;
        }
        let mut subs = self.subscribers.write().await;
        for event in events {
            let frame = ServerFrame::Change(*event);
            let Ok(bytes) = api::encode_server(&frame) else {
                tracing::error!(table = %event.table, "failed to encode change event");
                continue;
            };
            subs.retain(|conn_id, sender| {
                let alive = sender.send(Message::Binary(bytes.clone().into())).is_ok();
                if !alive {
                    tracing::debug!(conn_id = %conn_id, "pruning dead subscriber");
                }
                alive
            });
        }
    }
}

/// Handles an upgraded WebSocket connection.
///
/// A writer task forwards frames from the connection's channel to the
/// socket; the reader loop runs inline and processes frames until the
/// client disconnects, at which point the subscription is dropped.
pub async fn handle_socket(socket: WebSocket, state: Arc<HubState>) {
    let conn_id = state.next_conn_id();
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    tracing::info!(conn_id = %conn_id, "client connected");

    let mut write_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            msg = ws_receiver.next() => {
                match msg {
                    Some(Ok(Message::Binary(data))) => {
                        handle_frame(conn_id, &data, &tx, &state).await;
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => {
                        break;
                    }
                    Some(Ok(_)) => {
                        // Ignore text, ping, pong frames.
                    }
                }
            }
            _ = &mut write_task => {
                break;
            }
        }
    }

    write_task.abort();
    state.unsubscribe(conn_id).await;
    tracing::info!(conn_id = %conn_id, "client disconnected");
}

/// Handles one binary frame from a connection.
async fn handle_frame(
    conn_id: ConnId,
    data: &[u8],
    tx: &mpsc::UnboundedSender<Message>,
    state: &Arc<HubState>,
) {
    let frame = match api::decode_client(data) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(conn_id = %conn_id, error = %e, "failed to decode client frame");
            return;
        }
    };

    match frame {
        ClientFrame::Request { id, request } => {
            tracing::debug!(conn_id = %conn_id, request_id = %id, request = ?request, "handling request");
            let (response, events) = {
                let mut tables = state.tables.write().await;
                tables.apply(request, Utc::now())
            };
            let reply = ServerFrame::Response { id, response };
            match api::encode_server(&reply) {
                Ok(bytes) => {
                    let _ = tx.send(Message::Binary(bytes.into()));
                }
                Err(e) => {
                    tracing::error!(conn_id = %conn_id, error = %e, "failed to encode response");
                }
            }
            state.broadcast(&events).await;
        }
        ClientFrame::Subscribe => {
            tracing::info!(conn_id = %conn_id, "subscribed to change feed");
            state.subscribe(conn_id, tx.clone()).await;
        }
        ClientFrame::Unsubscribe => {
            tracing::info!(conn_id = %conn_id, "unsubscribed from change feed");
            state.unsubscribe(conn_id).await;
        }
    }
}

/// Starts the hub server on the given address and returns the bound
/// address and a join handle.
///
/// This is the primary entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(HubState::new())).await
}

/// Starts the hub server with a pre-configured [`HubState`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<HubState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = axum::Router::new()
        .route("/ws", axum::routing::get(ws_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "hub server error");
        }
    });

    Ok((bound_addr, handle))
}

/// axum handler that upgrades an HTTP request to a WebSocket connection.
async fn ws_handler(
    ws: axum::extract::ws::WebSocketUpgrade,
    axum::extract::State(state): axum::extract::State<Arc<HubState>>,
) -> impl axum::response::IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}
