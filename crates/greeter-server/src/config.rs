//! Server configuration.

/// Configuration for the greeter server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// TCP port to listen on (`0` asks the OS for a free port).
    pub port: u16,
    /// Host address to bind.
    pub host: String,
    /// Per-session send queue capacity.
    pub max_send_queue: usize,
    /// Interval between heartbeat pings, in seconds.
    pub heartbeat_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".into(),
            max_send_queue: 256,
            heartbeat_interval_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn default_host() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.host, "0.0.0.0");
    }

    #[test]
    fn default_send_queue() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.max_send_queue, 256);
    }

    #[test]
    fn default_heartbeat_interval() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.heartbeat_interval_secs, 30);
    }

    #[test]
    fn custom_values() {
        let cfg = ServerConfig {
            port: 9000,
            host: "127.0.0.1".into(),
            max_send_queue: 8,
            heartbeat_interval_secs: 5,
        };
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.max_send_queue, 8);
        assert_eq!(cfg.heartbeat_interval_secs, 5);
    }
}
