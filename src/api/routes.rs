// ==========================================
// Order Batch Ingestion Service - Router and application state
// ==========================================
// Explicit wiring: one shared SQLite connection feeds the repositories,
// the processor composes them, and every handler receives the state by
// injection. No global mutable state.
// ==========================================

use crate::api::{auth, load_api};
use crate::importer::BatchProcessor;
use crate::repository::error::RepositoryResult;
use crate::repository::{
    SqliteBatchLoadRepository, SqliteCatalogRepository, SqliteOrderRepository,
};
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use chrono_tz::Tz;
use rusqlite::Connection;
use serde_json::json;
use std::sync::{Arc, Mutex};

/// The concrete processor wiring used by the service.
pub type SqliteBatchProcessor =
    BatchProcessor<SqliteBatchLoadRepository, SqliteCatalogRepository, SqliteOrderRepository>;

// ==========================================
// AppState - per-request dependencies
// ==========================================
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<SqliteBatchProcessor>,
    /// Separate handle for response assembly (batch + children reads)
    pub batches: Arc<SqliteBatchLoadRepository>,
    pub jwt_secret: Arc<String>,
}

/// Wire the application state over a shared connection.
pub fn build_state(
    conn: Arc<Mutex<Connection>>,
    jwt_secret: String,
    business_tz: Tz,
    batch_size_hint: usize,
) -> RepositoryResult<AppState> {
    let processor = BatchProcessor::new(
        SqliteBatchLoadRepository::from_connection(conn.clone())?,
        SqliteCatalogRepository::from_connection(conn.clone())?,
        SqliteOrderRepository::from_connection(conn.clone())?,
        business_tz,
        batch_size_hint,
    );

    Ok(AppState {
        processor: Arc::new(processor),
        batches: Arc::new(SqliteBatchLoadRepository::from_connection(conn)?),
        jwt_secret: Arc::new(jwt_secret),
    })
}

/// Build the service router.
///
/// `/api/v1/orders/load` sits behind the bearer-auth middleware;
/// `/health` is open.
pub fn build_router(state: AppState) -> Router {
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/v1/orders/load", post(load_api::load_orders))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

/// Liveness endpoint.
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": crate::APP_NAME,
        "version": crate::VERSION,
    }))
}
