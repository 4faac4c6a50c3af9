//! Passport start-page service.
//!
//! Runs one background refresh task per enabled widget and serves the
//! cached snapshots over HTTP. The process stops on Ctrl-C, when the server
//! stops, or when a cache reports that it can never become usable.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::task::JoinSet;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use passport::{server, AppState, Args};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing before resolving so deprecation warnings are visible
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);
    if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let config = args.resolve().context("Invalid configuration")?;

    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!(
        listen = %config.listen,
        weather = config.weather.is_some(),
        uptime = config.uptime.is_some(),
        "Starting passport"
    );

    let state = Arc::new(
        AppState::from_config(&config)
            .context("Failed to set up widget caches")?
            .with_prometheus(prometheus_handle),
    );

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;

    // Background refresh, one task per enabled widget
    let mut caches = JoinSet::new();
    for task in state.start_caches() {
        caches.spawn(async move {
            let cache = task.cache().to_string();
            (cache, task.join().await)
        });
    }

    let mut server = tokio::spawn(server::run_server(state.clone(), listener));

    let cache_failure = async {
        while let Some(joined) = caches.join_next().await {
            match joined {
                Ok((_, Err(e))) => return anyhow::Error::new(e),
                Ok((cache, Ok(()))) => warn!(cache = %cache, "Refresh task stopped"),
                Err(e) => return anyhow!("Refresh supervisor failed: {}", e),
            }
        }
        // No widget enabled, or every task was cancelled
        std::future::pending().await
    };

    tokio::select! {
        result = &mut server => {
            match result {
                Ok(Ok(())) => warn!("HTTP server stopped"),
                Ok(Err(e)) => return Err(e.context("HTTP server failed")),
                Err(e) => return Err(anyhow!("HTTP server task failed: {}", e)),
            }
        }
        err = cache_failure => {
            error!(error = %err, "Widget cache failed, shutting down");
            return Err(err);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    server.abort();
    info!("Passport stopped");

    Ok(())
}
