//! HOS scheduler service
//!
//! Serves trip planning over HTTP together with health and metrics
//! endpoints.

use anyhow::{Context, Result};
use hos_lib::{
    health::{components, HealthRegistry},
    limits::HosLimits,
    observability::{SchedulerMetrics, StructuredLogger},
    planner::{BoundedLookup, PassthroughLookup},
    TripScheduler,
};
use hos_server::{api, config::ServerConfig};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = ServerConfig::load()?;
    info!(instance = %config.instance_name, port = config.api_port, "Server configured");

    let limits = HosLimits::default();
    limits.validate().context("Invalid HOS limits")?;
    let options = config.schedule_options()?;
    options.validate().context("Invalid schedule options")?;

    let health_registry = HealthRegistry::new();
    health_registry.register(components::PLANNER).await;
    health_registry.register(components::LOCATION_LOOKUP).await;

    let metrics = SchedulerMetrics::new();
    let logger = StructuredLogger::new(&config.instance_name);

    // No geocoding backend is wired in; stops carry their route position
    let lookup = BoundedLookup::new(
        Arc::new(PassthroughLookup),
        config.lookup_timeout(),
        tokio::runtime::Handle::current(),
    );
    let scheduler = TripScheduler::new(limits, options, Arc::new(lookup), logger.clone());

    let app_state = Arc::new(api::AppState::new(
        scheduler,
        health_registry.clone(),
        metrics,
    ));
    health_registry.set_ready(true).await;

    logger.log_startup(SERVER_VERSION, &format!("0.0.0.0:{}", config.api_port));
    let mut api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    tokio::select! {
        result = &mut api_handle => {
            match result {
                Ok(Ok(())) => logger.log_shutdown("API server exited"),
                Ok(Err(e)) => {
                    error!(error = %e, "API server failed");
                    return Err(e);
                }
                Err(e) => return Err(e).context("API server task panicked"),
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            logger.log_shutdown("SIGINT received");
            api_handle.abort();
        }
    }

    info!("Shutting down");
    Ok(())
}
