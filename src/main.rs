//! AEGIS health monitor
//!
//! Real-time backend for a wearable sensor hub: every snapshot is run through
//! a rule-based engine that scores overall health, classifies risk, and
//! raises safety alerts for falls, fire, and extreme vitals.
//!
//! ⚠️ DISCLAIMER:
//! This system is NOT a medical diagnostic tool.

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod engine;
mod error;
mod handlers;
mod hub;
mod models;
mod state;
mod validation;
mod websocket;

use crate::config::Settings;
use crate::engine::{HealthAnalysisEngine, HealthHistory};
use crate::hub::SensorHubSimulator;
use crate::state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenv::dotenv().ok();

    // Logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,aegis=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .init();

    // Load configuration
    let settings = Settings::from_env()?;
    let bind_address = format!("{}:{}", settings.server.host, settings.server.port);

    info!("Starting AEGIS health monitor");
    info!("Binding server to {}", bind_address);

    // Analysis engine, owned by the shared state
    let history = HealthHistory::with_capacity(settings.engine.history_capacity);
    let rng = match settings.engine.rng_seed {
        Some(seed) => {
            info!(seed = seed, "Using seeded engine randomness");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let engine = HealthAnalysisEngine::with_history(history, rng);
    let app_state = Arc::new(RwLock::new(AppState::new(engine)));

    // ---------------------------------------------------------------------
    // Simulated sensor hub
    // IMPORTANT: use actix_rt::spawn (NOT tokio::spawn)
    // ---------------------------------------------------------------------
    if settings.sensor.simulation {
        let hub_state = app_state.clone();
        let interval_ms = settings.sensor.interval_ms;

        actix_rt::spawn(async move {
            SensorHubSimulator::new(interval_ms).run(hub_state).await;
        });
    } else {
        info!("Sensor simulation disabled; waiting for snapshots on /api/readings");
    }

    // ---------------------------------------------------------------------
    // HTTP + WebSocket server
    // ---------------------------------------------------------------------
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure_routes)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
