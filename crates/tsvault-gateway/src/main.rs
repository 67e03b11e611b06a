//! tsvault gateway
//!
//! - Query API: /api/measurements, /api/measurements/metrics
//! - Ops: /healthz, /readyz, /metrics
//! - Graceful shutdown: flip readiness to draining, finish in-flight
//!   requests, then close the store.

use tsvault_core::error::{Result, TsVaultError};
use tsvault_gateway::{app_state::AppState, config, obs, router};

#[tokio::main]
async fn main() {
    obs::init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = %e, code = e.client_code().as_str(), "tsvault-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.server.listen_addr()?;

    let state = AppState::open(cfg).await?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config = %path, "tsvault-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| TsVaultError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.clone()))
        .await
        .map_err(|e| TsVaultError::Internal(format!("server failed: {e}")))?;

    state.store().close().await?;
    tracing::info!("tsvault-gateway stopped");
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
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
    state.set_draining();
    tracing::info!("signal received, starting graceful shutdown");
}
