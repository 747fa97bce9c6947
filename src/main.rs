use habit_tracker::{router, LogStore, Settings, SheetsClient, Tracker};
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let settings = Settings::from_env();
    fs::create_dir_all(&settings.data_dir).await?;

    let log_store = Arc::new(LogStore::new(&settings.data_dir));
    let remote = Arc::new(SheetsClient::new(
        &settings.sheets_api_base,
        settings.remote_timeout,
    )?);
    let tracker = Tracker::start(
        log_store,
        remote,
        settings.sync_latency,
        settings.remote_timeout,
    )
    .await;

    let initial = tracker.refresh().await;
    info!(
        habits = initial.habits.len(),
        daily_logs = initial.daily_logs.len(),
        mood_logs = initial.mood_logs.len(),
        data_dir = %settings.data_dir.display(),
        "state loaded"
    );

    let app = router(tracker);
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutting down"),
        Err(err) => {
            warn!("failed to listen for shutdown signal: {err}");
            std::future::pending::<()>().await;
        }
    }
}
