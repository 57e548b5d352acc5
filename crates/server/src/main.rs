// SPDX-License-Identifier: MIT

//! Entrypoint: load config, recover the store, spawn the watchdogs, serve
//! the router until a signal asks it to stop (grounded on
//! `iwismer-rusty-timer`'s `services/server/src/main.rs`).

use std::process::ExitCode;
use std::sync::Arc;

use pushpals_server::config::PushPalsConfig;
use pushpals_server::session_hub::SessionHub;
use pushpals_server::transport::{build_router, AppState};
use pushpals_server::watchdogs;
use pushpals_storage::Store;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let log_filter = std::env::var("PUSHPALS_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_filter))
        .init();

    let config = match PushPalsConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let store = match Store::open(&config.state_dir) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            tracing::error!(error = %err, state_dir = %config.state_dir.display(), "failed to open store");
            return ExitCode::FAILURE;
        }
    };

    let hub = SessionHub::new(config.subscriber_buffer);
    watchdogs::spawn_all(store.clone(), hub.clone(), &config);

    let config = Arc::new(config);
    let state = AppState::new(store, hub, config.clone());
    let router = build_router(state);

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, addr = %config.bind_addr, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(addr = %config.bind_addr, "pushpals-server listening");

    if let Err(err) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %err, "server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("pushpals-server shut down gracefully");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { tracing::info!("received Ctrl+C, shutting down"); },
        _ = terminate => { tracing::info!("received SIGTERM, shutting down"); },
    }
}
