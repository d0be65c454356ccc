//! # greeter-server
//!
//! Websocket greeter service: accepts connections on one port, logs every
//! client message, and immediately sends two fixed JSON payloads to each
//! newly connected client.
//!
//! - Handshake and framing are entirely the library's job (`axum` with the
//!   `ws` feature)
//! - One reader/writer task pair per connection with a bounded send queue
//! - Process-wide session registry, used for observability only
//! - Structured lifecycle logging via `tracing`

pub mod config;
pub mod error;
pub mod greeter;
pub mod registry;
pub mod server;
pub mod session;

pub use config::ServerConfig;
pub use error::{SendError, ServerError};
pub use server::{start, ServerHandle};
