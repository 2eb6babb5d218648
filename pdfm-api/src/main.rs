use anyhow::Context;
use clap::Parser;
use pdfm_api::{router, AppState, Settings};
use pdfm_core::store::Database;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdfm_api=debug,pdfm_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::parse();

    let db = match &settings.data_file {
        Some(path) => Database::open(path)
            .with_context(|| format!("failed to open data file {}", path.display()))?,
        None => {
            warn!("no data file configured, data will be lost on shutdown");
            Database::in_memory()
        }
    };
    let state = AppState::new(Arc::new(db), &settings);

    if let Some((name, email, password)) = settings.admin_account() {
        let admin = state.users.ensure_admin(name, email, password).await;
        info!(user_id = %admin.id, "administrator account ready");
    }

    let maintenance = tokio::spawn(maintenance_loop(state.clone(), settings.snapshot_interval()));

    let app = router(state.clone(), &settings);
    let listener = tokio::net::TcpListener::bind(settings.bind)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind))?;

    info!("PDFM API listening on http://{}", settings.bind);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    maintenance.abort();
    state.sessions.purge_expired().await;
    if state.db.flush().await.context("final snapshot failed")? {
        info!("snapshot written on shutdown");
    }
    Ok(())
}

/// Periodically drop expired tokens and write the snapshot
async fn maintenance_loop(state: AppState, period: std::time::Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        state.sessions.purge_expired().await;
        if let Err(e) = state.db.flush().await {
            error!(error = %e, "periodic snapshot failed");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
