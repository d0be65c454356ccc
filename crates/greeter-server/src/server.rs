//! Axum HTTP + websocket server: listener, upgrade handling, and the
//! per-connection reader/writer loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tower_http::cors::CorsLayer;
use tracing::{info, trace, warn};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::greeter;
use crate::registry::SessionRegistry;
use crate::session::{Session, SessionId};

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registry of active sessions.
    pub registry: Arc<SessionRegistry>,
    /// When the server started.
    pub start_time: Instant,
    /// Per-session send queue capacity.
    pub max_send_queue: usize,
    /// Interval between heartbeat pings.
    pub heartbeat_interval: Duration,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Create and start the server. Returns a handle holding the serve task.
///
/// A bind failure is the only fatal error; everything after startup is
/// contained to individual sessions.
pub async fn start(config: ServerConfig) -> Result<ServerHandle, ServerError> {
    let registry = Arc::new(SessionRegistry::new());

    let state = AppState {
        registry: Arc::clone(&registry),
        start_time: Instant::now(),
        max_send_queue: config.max_send_queue,
        heartbeat_interval: Duration::from_secs(config.heartbeat_interval_secs),
    };

    let router = build_router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!(port = local_addr.port(), "greeter server started");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
            .ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        registry,
        shutdown: shutdown_tx,
        server,
    })
}

/// Handle returned by `start()` — keeps the serve task alive.
#[derive(Debug)]
pub struct ServerHandle {
    /// The bound port (resolved when the config asked for port `0`).
    pub port: u16,
    registry: Arc<SessionRegistry>,
    shutdown: oneshot::Sender<()>,
    server: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Registry of active sessions.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Stop accepting new connections and wait for open sessions to drain
    /// to their own natural close.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.server.await;
    }
}

/// Websocket upgrade handler.
///
/// The handshake itself is the library's job. A rejected upgrade is logged
/// and answered with the library's error response; the listener keeps
/// serving other connections.
async fn ws_handler(
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Response {
    match upgrade {
        Ok(ws) => {
            let id = SessionId::from_headers(&headers);
            ws.on_upgrade(move |socket| handle_socket(socket, id, state))
                .into_response()
        }
        Err(rejection) => {
            warn!(error = %rejection, "websocket handshake failed");
            rejection.into_response()
        }
    }
}

/// Run one session: register, greet, pump frames until close, unregister.
async fn handle_socket(socket: WebSocket, id: SessionId, state: AppState) {
    let (tx, rx) = mpsc::channel(state.max_send_queue);
    let session = Arc::new(Session::new(id, tx));

    state.registry.insert(Arc::clone(&session));
    info!(session_id = %session.id, "client connected");

    greeter::greet(&session);

    run_session(socket, Arc::clone(&session), rx, state.heartbeat_interval).await;

    close_session(&session, &state.registry);
}

/// Close path shared by every exit route.
///
/// Idempotent: only the first signal unregisters the session and logs the
/// disconnect.
fn close_session(session: &Session, registry: &SessionRegistry) {
    if session.close() {
        registry.remove(&session.id);
        info!(session_id = %session.id, "client disconnected");
    }
}

/// Split the socket into reader and writer halves and pump both until
/// either side finishes.
async fn run_session(
    socket: WebSocket,
    session: Arc<Session>,
    mut rx: mpsc::Receiver<String>,
    heartbeat_interval: Duration,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Writer: forward queued messages to the socket + periodic ping.
    let writer_id = session.id.clone();
    let mut writer = tokio::spawn(async move {
        let mut ping_interval = tokio::time::interval(heartbeat_interval);
        ping_interval.tick().await; // consume the immediate first tick

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    match msg {
                        Some(text) => {
                            if ws_tx.send(WsMessage::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = ping_interval.tick() => {
                    if ws_tx.send(WsMessage::Ping(vec![].into())).await.is_err() {
                        break;
                    }
                    trace!(session_id = %writer_id, "sent ping");
                }
            }
        }
    });

    // Reader: log inbound text frames. The demo never replies.
    let reader_session = Arc::clone(&session);
    let mut reader = tokio::spawn(async move {
        while let Some(Ok(msg)) = ws_rx.next().await {
            match msg {
                WsMessage::Text(text) => {
                    info!(
                        session_id = %reader_session.id,
                        message = %text.as_str(),
                        "message received"
                    );
                }
                WsMessage::Pong(_) => {
                    trace!(session_id = %reader_session.id, "pong received");
                }
                WsMessage::Close(_) => break,
                WsMessage::Ping(_) => {} // axum replies automatically
                _ => {}
            }
        }
    });

    // Either half finishing ends the session; stop the other so nothing is
    // read or written past the close.
    tokio::select! {
        _ = &mut writer => reader.abort(),
        _ = &mut reader => writer.abort(),
    }
}

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server is running.
    pub status: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// Current session count.
    pub connections: usize,
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        connections: state.registry.count(),
    })
}
