//! Per-client session state.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use axum::http::HeaderMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::SendError;

/// Unique session identifier.
///
/// Derived from the client's `Sec-WebSocket-Key` handshake header, so it is
/// stable for the lifetime of the connection but not globally unique across
/// restarts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub String);

impl SessionId {
    /// Derive an id from the upgrade request headers.
    ///
    /// The header is not guaranteed to be present on every upgrade we
    /// accept, so a missing or non-UTF-8 value falls back to a generated id.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get("sec-websocket-key")
            .and_then(|value| value.to_str().ok())
            .map(|key| Self(key.to_owned()))
            .unwrap_or_default()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self(format!("session_{}", Uuid::now_v7()))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    Closed,
}

/// A connected websocket client.
///
/// Owns the send queue to its socket writer task. The id is assigned once
/// at creation and never changes; the state transitions
/// `Connected -> Closed` exactly once.
#[derive(Debug)]
pub struct Session {
    /// Unique session id.
    pub id: SessionId,
    /// Send queue to the session's socket writer task.
    tx: mpsc::Sender<String>,
    /// Set on the first close signal.
    closed: AtomicBool,
    /// When the session was established.
    pub connected_at: Instant,
}

impl Session {
    /// Create a new session in the connected state.
    pub fn new(id: SessionId, tx: mpsc::Sender<String>) -> Self {
        Self {
            id,
            tx,
            closed: AtomicBool::new(false),
            connected_at: Instant::now(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        if self.closed.load(Ordering::Relaxed) {
            SessionState::Closed
        } else {
            SessionState::Connected
        }
    }

    /// Queue a text message for the writer task.
    ///
    /// Fails without blocking when the session is closed, the queue is
    /// full, or the writer task is gone.
    pub fn send(&self, message: &str) -> Result<(), SendError> {
        if self.closed.load(Ordering::Relaxed) {
            return Err(SendError::SessionClosed);
        }
        match self.tx.try_send(message.to_owned()) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(SendError::QueueFull),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SendError::ChannelClosed),
        }
    }

    /// Mark the session closed.
    ///
    /// Returns `true` only for the first call, so the close path runs
    /// exactly once no matter how many signals arrive.
    pub fn close(&self) -> bool {
        !self.closed.swap(true, Ordering::Relaxed)
    }

    /// Session age.
    pub fn age(&self) -> std::time::Duration {
        self.connected_at.elapsed()
    }
}
