use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use farebox_api::{app, AppState};
use farebox_store::{seed, MemoryStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farebox_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = farebox_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Farebox API on port {}", config.server.port);

    let store = Arc::new(MemoryStore::new());
    seed::seed_sample_fleet(&store).await;

    let state = AppState::build(store, &config.booking);

    // Background sweep: releases seats held by abandoned pending bookings.
    let sweeper = state.sweeper.clone();
    let sweep_interval = config.booking.sweep_interval_seconds;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(sweep_interval));
        loop {
            interval.tick().await;
            if let Err(err) = sweeper.sweep().await {
                tracing::error!("expiry sweep failed: {err}");
            }
        }
    });

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
