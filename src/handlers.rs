//! HTTP request handlers
//!
//! REST endpoints over the analysis engine plus the WebSocket upgrade.

use actix_web::{web, HttpRequest, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{AnalysisResult, HealthBreakdown, HealthCheck, Trend};
use crate::state::AppState;
use crate::validation::{decode_reading, validate_pagination};
use crate::websocket::WsSession;

type SharedState = web::Data<Arc<RwLock<AppState>>>;

/// Configure all application routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Health check
            .route("/health", web::get().to(health_check))
            // Sensor snapshot endpoints
            .route("/readings", web::post().to(ingest_reading))
            .route("/readings/latest", web::get().to(get_latest_reading))
            // Analysis endpoints
            .route("/analysis/latest", web::get().to(get_latest_analysis))
            .route("/analysis/history", web::get().to(get_analysis_history))
            .route("/analysis/statistics", web::get().to(get_statistics))
            .route("/analysis/trend", web::get().to(get_trend))
            .route("/analysis/breakdown", web::get().to(get_breakdown)),
    )
    // WebSocket endpoint
    .route("/ws", web::get().to(websocket_handler));
}

/// Health check endpoint
///
/// GET /api/health
pub async fn health_check(state: SharedState) -> Result<HttpResponse, AppError> {
    let state = state.read().await;

    let health = HealthCheck {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        uptime_seconds: state.uptime_seconds(),
        last_analysis: state.last_analysis_time(),
        connected_clients: state.client_count(),
        manual_triggers: state.manual_triggers(),
    };

    Ok(HttpResponse::Ok().json(health))
}

#[derive(Serialize)]
struct IngestResponse {
    success: bool,
    sequence: u64,
    correlation_id: String,
    analysis: AnalysisResult,
}

/// Ingest a hub snapshot and analyze it
///
/// POST /api/readings
///
/// The body uses the hub wire format. Missing fields are accepted.
pub async fn ingest_reading(
    state: SharedState,
    body: String,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let correlation_id = extract_correlation_id(&req);

    info!(
        correlation_id = %correlation_id,
        "Received sensor snapshot ingestion request"
    );

    let reading = decode_reading(&body)?;

    let (sequence, analysis) = {
        let mut state = state.write().await;
        let analysis = state.ingest(reading);
        (state.sequence(), analysis)
    };

    info!(
        correlation_id = %correlation_id,
        sequence = sequence,
        overall_health = analysis.overall_health,
        risk_level = ?analysis.risk_level,
        "Sensor snapshot analyzed"
    );

    Ok(HttpResponse::Created().json(IngestResponse {
        success: true,
        sequence,
        correlation_id,
        analysis,
    }))
}

/// Get latest sensor snapshot
///
/// GET /api/readings/latest
pub async fn get_latest_reading(state: SharedState) -> Result<HttpResponse, AppError> {
    let state = state.read().await;

    match state.latest_reading() {
        Some(reading) => Ok(HttpResponse::Ok().json(reading)),
        None => Err(AppError::NotFound("No sensor readings available".to_string())),
    }
}

/// Get latest analysis
///
/// GET /api/analysis/latest
pub async fn get_latest_analysis(state: SharedState) -> Result<HttpResponse, AppError> {
    let state = state.read().await;
    let analysis = latest_analysis(&state)?;

    Ok(HttpResponse::Ok().json(analysis))
}

/// Query parameters for analysis history
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Serialize)]
struct PaginatedResponse<T> {
    data: Vec<T>,
    page: u32,
    limit: u32,
    total: u32,
    total_pages: u32,
}

/// Get analysis history, newest first
///
/// GET /api/analysis/history?page=1&limit=100
pub async fn get_analysis_history(
    state: SharedState,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse, AppError> {
    let (page, limit) = validate_pagination(query.page, query.limit)?;

    let state = state.read().await;
    let history = state.engine().history();
    let total = history.len();

    let paginated: Vec<&AnalysisResult> = history
        .recent(total)
        .into_iter()
        .skip((page as usize - 1) * limit as usize)
        .take(limit as usize)
        .collect();

    Ok(HttpResponse::Ok().json(PaginatedResponse {
        data: paginated,
        page,
        limit,
        total: total as u32,
        total_pages: ((total as f64) / (limit as f64)).ceil() as u32,
    }))
}

/// Get history statistics
///
/// GET /api/analysis/statistics
pub async fn get_statistics(state: SharedState) -> Result<HttpResponse, AppError> {
    let state = state.read().await;
    let stats = state.engine().history().statistics();

    Ok(HttpResponse::Ok().json(stats))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrendResponse {
    pub trend: Trend,
    pub samples: usize,
}

/// Forecast from the most recent scores
///
/// GET /api/analysis/trend
pub async fn get_trend(state: SharedState) -> Result<HttpResponse, AppError> {
    let state = state.read().await;
    let engine = state.engine();

    Ok(HttpResponse::Ok().json(TrendResponse {
        trend: engine.predict_trend(),
        samples: engine.history().len(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownResponse {
    pub overall_health: u8,
    #[serde(flatten)]
    pub breakdown: HealthBreakdown,
}

/// Display breakdown of the latest overall score
///
/// GET /api/analysis/breakdown
pub async fn get_breakdown(state: SharedState) -> Result<HttpResponse, AppError> {
    // Breakdown draws from the engine's RNG, so it needs the write guard
    let mut state = state.write().await;
    let overall_health = latest_analysis(&state)?.overall_health;
    let breakdown = state.engine_mut().health_breakdown(overall_health);

    Ok(HttpResponse::Ok().json(BreakdownResponse {
        overall_health,
        breakdown,
    }))
}

fn latest_analysis(state: &AppState) -> AppResult<&AnalysisResult> {
    state
        .latest_analysis()
        .ok_or_else(|| AppError::NotFound("No analysis available".to_string()))
}

/// WebSocket upgrade handler
///
/// GET /ws
pub async fn websocket_handler(
    req: HttpRequest,
    stream: web::Payload,
    state: SharedState,
) -> Result<HttpResponse, actix_web::Error> {
    let client_id = Uuid::new_v4().to_string();

    info!(client_id = %client_id, "WebSocket connection request");

    // Register client; triggers fired before this point are not replayed
    let seen_triggers = {
        let mut state = state.write().await;
        state.add_client(client_id.clone());
        state.manual_triggers()
    };

    let ws_session = WsSession::new(client_id, state.get_ref().clone(), seen_triggers);

    actix_web_actors::ws::start(ws_session, &req, stream)
}

/// Extract or generate correlation ID from request headers
fn extract_correlation_id(req: &HttpRequest) -> String {
    req.headers()
        .get("X-Correlation-ID")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
