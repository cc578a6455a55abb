//! LINE relay web server.
//!
//! Serves the webhook, push, and health endpoints. Starts even without LINE
//! credentials, in which case `/webhook` and `/send` answer 500 until the
//! process is restarted with them set.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use linerelay::{router, sink_from_config, AppState, BotService, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    let config = Config::from_env();
    info!(
        port = config.port,
        channel_secret_configured = config.channel_secret.is_some(),
        channel_token_configured = config.channel_token.is_some(),
        notify_webhook_configured = config.notify_webhook_url.is_some(),
        notify_amqp_configured = config.notify_amqp_url.is_some(),
        "config_loaded"
    );

    let sink = sink_from_config(&config).context("Failed to create notification sink")?;

    let bot = BotService::from_config(&config, sink.clone());
    let forwarder = bot.as_ref().map(|b| b.forwarder().clone());
    let state = AppState::new(bot);
    info!(ready = state.is_ready(), "app_state_created");

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Messages already acked to LINE will not be redelivered
    if let Some(forwarder) = forwarder {
        forwarder.drain(config.notify_timeout()).await;
    }

    sink.close().await;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
