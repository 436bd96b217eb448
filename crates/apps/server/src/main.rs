mod api;
mod config;

use std::process::ExitCode;

use axum::http::Method;
use catalog::Dataset;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::ApiState;
use crate::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), String> {
    let config = Config::from_env()?;

    let (dataset, warnings) = match &config.data_path {
        Some(path) => Dataset::load_checked(path).map_err(|e| e.to_string())?,
        None => (Dataset::sample().map_err(|e| e.to_string())?, Vec::new()),
    };
    for warning in warnings {
        warn!("dataset: {warning}");
    }
    info!(
        readings = dataset.readings.len(),
        factories = dataset.factories.len(),
        source = ?config.data_path,
        "dataset loaded"
    );

    let state = ApiState::from_dataset(&dataset).map_err(|e| e.to_string())?;
    let mut app = api::router(state);
    if config.cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_headers(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS]);
        app = app.layer(cors);
    }
    let app = app.layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| format!("failed to bind {}: {e}", config.addr))?;
    info!("aqi server listening on http://{}", config.addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("server error: {e}"))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
