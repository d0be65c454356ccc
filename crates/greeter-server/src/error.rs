//! Error taxonomy for the greeter service.
//!
//! Only a bind failure is fatal. Everything that happens on one session's
//! connection is contained to that session.

use std::io;

/// Fatal startup errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
}

/// A message could not be handed to a session's writer task.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SendError {
    /// The session has already transitioned to closed.
    #[error("session is closed")]
    SessionClosed,

    /// The writer task is gone, so the queue no longer has a receiver.
    #[error("send queue is closed")]
    ChannelClosed,

    /// The bounded send queue is full.
    #[error("send queue is full")]
    QueueFull,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_error_display_includes_address() {
        let err = ServerError::Bind {
            addr: "0.0.0.0:8080".into(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };
        let text = err.to_string();
        assert!(text.contains("0.0.0.0:8080"));
        assert!(text.contains("address in use"));
    }

    #[test]
    fn send_error_display() {
        assert_eq!(SendError::SessionClosed.to_string(), "session is closed");
        assert_eq!(SendError::ChannelClosed.to_string(), "send queue is closed");
        assert_eq!(SendError::QueueFull.to_string(), "send queue is full");
    }

    #[test]
    fn send_error_equality() {
        assert_eq!(SendError::QueueFull, SendError::QueueFull);
        assert_ne!(SendError::QueueFull, SendError::ChannelClosed);
    }
}
