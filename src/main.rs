use clap::Parser;
use greeter_server::ServerConfig;

/// Websocket greeter demo server.
///
/// Listens on one port, logs client messages, and sends two fixed JSON
/// payloads to every newly connected client.
#[derive(Parser, Debug)]
#[command(name = "greeter", version)]
struct Cli {
    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = ServerConfig {
        port: cli.port,
        ..ServerConfig::default()
    };

    let handle = match greeter_server::start(config).await {
        Ok(handle) => handle,
        Err(error) => {
            tracing::error!(%error, "failed to start server");
            std::process::exit(1);
        }
    };

    println!("Server Listening on port {}", handle.port);
    println!("===============================================");

    // Wait for shutdown signal
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to listen for ctrl+c");
        std::process::exit(1);
    }

    tracing::info!("shutting down");
}
