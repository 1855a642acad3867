//! Timer Deck - categorized countdown timers with halfway alerts
//!
//! This is the host process: it wires a file-backed store and a broadcasting
//! notification sink into a timer session and serves the HTTP API.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use timer_deck::{
    api::create_router,
    config::Config,
    notify::BroadcastSink,
    persistence::FileGateway,
    session::TimerSession,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("timer_deck={},tower_http=info", config.log_level()))
        .init();

    info!("Starting timer-deck v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, data_dir={}",
          config.host, config.port, config.data_dir.display());

    let gateway = FileGateway::new(&config.data_dir)?;
    let sink = BroadcastSink::new(config.event_buffer);

    // Load stored timers and start ticking
    let session = TimerSession::open(Arc::new(gateway), Arc::new(sink.clone()));

    // Create HTTP router with all endpoints
    let app = create_router(session.state(), sink);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /timers                     - List timers");
    info!("  POST /timers                     - Create a timer");
    info!("  POST /timers/:id/start|pause|reset");
    info!("  PUT  /timers/:id/halfway-alert   - Toggle the halfway alert");
    info!("  GET  /categories                 - Timers grouped by category");
    info!("  POST /categories/:name/start|pause");
    info!("  GET  /history                    - Completed timers");
    info!("  GET  /events                     - Live halfway/completion stream");
    info!("  GET  /status, /health");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    session.close().await;

    info!("Server shutdown complete");
    Ok(())
}
