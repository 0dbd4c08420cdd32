//! csrhub gateway binary.
//!
//! Config path: first CLI argument, else `CSRHUB_CONFIG`, else `csrhub.yaml`.

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use csrhub_gateway::{app_state::AppState, config, router};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "csrhub-gateway failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> csrhub_core::Result<()> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CSRHUB_CONFIG").ok())
        .unwrap_or_else(|| "csrhub.yaml".to_string());

    let cfg = config::load_from_file(&path)?;
    let listen = cfg.server.listen_addr()?;

    let state = AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config = %path, "csrhub-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| csrhub_core::CsrError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| csrhub_core::CsrError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
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
