//! TTL Dispatch demo service
//!
//! Serves the TTL cache over HTTP and logs cache lifecycle events through the
//! dispatcher.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_dispatch::api::create_router;
use ttl_dispatch::models::{
    events::{EVENT_CLEAR, EVENT_DELETE, EVENT_SET},
    CacheEvent,
};
use ttl_dispatch::{AppState, Config};

/// Main entry point for the demo service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache (which starts its reaper) and the dispatcher
/// 4. Subscribe lifecycle loggers
/// 5. Serve HTTP on the configured port
/// 6. On SIGINT/SIGTERM: stop serving, then stop the reaper and wait for it
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_dispatch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TTL Dispatch service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_ttl={}s, reap_interval={}s, port={}",
        config.cache_ttl, config.reap_interval, config.server_port
    );

    let state = AppState::from_config(&config).context("invalid cache configuration")?;
    info!("Cache initialized, reaper running");

    for event in [EVENT_SET, EVENT_DELETE, EVENT_CLEAR] {
        state.events.subscribe(event, |e: &CacheEvent| {
            info!(kind = ?e.kind, key = ?e.key, at = %e.at, "cache event");
            Ok(())
        });
    }

    let cache = state.cache.clone();
    let events = state.events.clone();
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    cache.close().await;
    let removed = events.clear();
    info!("Reaper stopped, {} subscriptions released", removed);
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
