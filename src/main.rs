//! EduNeuro - document accessibility server
//!
//! REST API for uploading documents and turning them into summaries,
//! highlighted or simplified text, narration and quizzes.

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use eduneuro::config::{print_env_help, ServerConfig};
use eduneuro::handlers::{build_protected_routes, build_public_routes, AppContext};
use eduneuro::{auth, metrics, middleware, tracing_setup};

// Shutdown timeouts
const GRACEFUL_SHUTDOWN_TIMEOUT_SECS: u64 = 30;
const DATABASE_FLUSH_TIMEOUT_SECS: u64 = 10;

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().any(|a| a == "--help-env") {
        print_env_help();
        return Ok(());
    }

    tracing_setup::init_tracing()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    metrics::register_metrics().context("Failed to register metrics")?;
    info!("📊 Metrics registered at /metrics");

    info!("📚 Starting EduNeuro server...");

    let server_config = ServerConfig::from_env();
    server_config.log();

    let state = Arc::new(AppContext::new(server_config.clone())?);
    let state_for_shutdown = Arc::clone(&state);

    // Protected API routes; auth only when configured
    let protected_routes = if server_config.require_auth {
        info!("🔐 API key authentication enabled");
        build_protected_routes(state.clone())
            .route_layer(axum::middleware::from_fn(auth::auth_middleware))
    } else {
        build_protected_routes(state.clone())
    };

    // Public routes: banner, health and metrics
    let public_routes = build_public_routes(state);

    let max_concurrent = server_config.max_concurrent_requests;
    info!(
        "🔄 Concurrency limiting enabled: max_concurrent={}",
        max_concurrent
    );

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(axum::middleware::from_fn(middleware::track_metrics))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server_config.request_timeout_secs,
        )))
        .layer(ConcurrencyLimitLayer::new(max_concurrent))
        .layer(server_config.cors.to_layer());

    let addr: SocketAddr = format!("{}:{}", server_config.host, server_config.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid bind address {}:{}",
                server_config.host, server_config.port
            )
        })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("🔒 Shutdown signal received, flushing storage...");

    let cleanup = async {
        let flush = async { state_for_shutdown.flush() };
        match tokio::time::timeout(Duration::from_secs(DATABASE_FLUSH_TIMEOUT_SECS), flush).await
        {
            Ok(Ok(())) => info!("✅ Storage flushed"),
            Ok(Err(e)) => tracing::error!("❌ Failed to flush storage: {:#}", e),
            Err(_) => tracing::error!(
                "⏱️  Storage flush timed out after {}s",
                DATABASE_FLUSH_TIMEOUT_SECS
            ),
        }
    };

    match tokio::time::timeout(Duration::from_secs(GRACEFUL_SHUTDOWN_TIMEOUT_SECS), cleanup).await
    {
        Ok(()) => info!("👋 Server shutdown complete"),
        Err(_) => {
            tracing::error!(
                "⏱️  Graceful shutdown timed out after {}s, forcing exit",
                GRACEFUL_SHUTDOWN_TIMEOUT_SECS
            );
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    info!("🛑 Shutdown signal received, starting graceful shutdown");
}
