//! # Tally API Server
//!
//! Serves like/dislike votes for posts over HTTP.

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

mod background;
mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env())
        .context("failed to install tracing subscriber")?;

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Tally API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await?;

    background::subscribe_invalidations(&state)
        .await
        .context("failed to subscribe to vote invalidations")?;

    #[cfg(feature = "scheduler")]
    let mut upkeep =
        background::start_scheduler(background::SchedulerConfig::from_env(), &state)
            .await
            .map_err(|e| anyhow::anyhow!("failed to start scheduler: {e:?}"))?;

    let server_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(server_state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    #[cfg(feature = "scheduler")]
    if let Err(e) = upkeep.shutdown().await {
        tracing::warn!(error = ?e, "Scheduler did not shut down cleanly");
    }

    if let Err(e) = state.pubsub.unsubscribe(tally_core::services::VOTES_CHANNEL).await {
        tracing::warn!(error = %e, "Failed to unsubscribe from vote invalidations");
    }

    Ok(())
}
