//! Finance Desk - WhatsApp intake assistant
//!
//! Greets parents and suppliers, collects student details for finance
//! requests and hands the conversation to the finance team when a person
//! needs to take over.

mod api;
mod bootstrap;
mod bridge;
mod config;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use bridge::{BridgeClient, DryRunTransport, LoggingTransport};
use config::DeskConfig;
use runtime::{spawn_dispatcher, InMemorySessionStore, SessionStore, Transport};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long queued messages get to drain after the server stops
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finance_desk=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Restore bridge credentials before anything connects
    bootstrap::restore_from_env(&std::env::current_dir()?).await?;

    let config = DeskConfig::from_env()?;

    let transport: Arc<dyn Transport> = match &config.bridge_url {
        Some(url) => {
            tracing::info!(url = %url, "Sending replies through bridge");
            Arc::new(BridgeClient::new(url, config.bridge_token.clone())?)
        }
        None => {
            tracing::warn!("BRIDGE_URL not set. Replies will only be logged.");
            Arc::new(DryRunTransport)
        }
    };
    let transport = LoggingTransport::new(transport);

    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let (inbound_tx, dispatcher) =
        spawn_dispatcher(config.desk_context(), Arc::clone(&store), transport);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(AppState::new(store, inbound_tx, &config.webhook_token))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Finance desk listening on {}", addr);

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    // The router held the last sender, so the dispatcher now drains and exits
    match tokio::time::timeout(DRAIN_TIMEOUT, dispatcher).await {
        Ok(Ok(())) => tracing::info!("Shutdown complete"),
        Ok(Err(e)) => tracing::error!(error = %e, "Dispatcher task failed"),
        Err(_) => tracing::warn!("Dispatcher did not drain in time"),
    }

    Ok(())
}

/// Cancel `token` on Ctrl-C or SIGTERM
async fn watch_signals(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C - shutting down"),
        () = terminate => tracing::info!("Received SIGTERM - shutting down"),
    }
    token.cancel();
}
