#![doc = include_str!("../README.md")]

mod server;

use clap::Parser;
use pwdhash::HashService;
use server::config::{CliArgs, ServerConfig};
use server::routes::{AppState, build_router};
use server::telemetry::init_telemetry;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    let providers = init_telemetry()?;
    let res = run_server(config).await;
    providers.shutdown();
    res
}

async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.server_addr).await?;
    log_startup_info(&config);

    let service = HashService::start(config.service.clone()).await?;
    let shutdown = CancellationToken::new();
    let router = build_router(AppState::new(service.clone(), shutdown.clone()));

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    // Connections are closed; let the workers finish whatever is queued.
    tracing::info!("HTTP server stopped, draining queued jobs...");
    service.shutdown().await?;

    let stats = service.stats();
    tracing::info!(
        total = stats.total,
        average_micros = stats.average,
        "Service shut down successfully"
    );
    Ok(())
}

fn log_startup_info(config: &ServerConfig) {
    if cfg!(debug_assertions) {
        tracing::info!(
            "Starting hash service on {} with full config: {:#?}",
            config.server_addr,
            config
        );
    } else {
        tracing::info!(
            "Starting hash service on {} with {} workers",
            config.server_addr,
            config.service.num_workers
        );
    }
}

async fn shutdown_signal(token: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {err}");
                core::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = core::future::pending::<()>();

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
            core::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
        () = token.cancelled() => {
            tracing::info!("Received shutdown request");
        },
    }

    tracing::info!("Shutdown signal received, terminating gracefully...");
}
