/*!
 * # Health Check Module
 *
 * - Basic health check (`/health`) - liveness plus a database ping
 * - Liveness check (`/health/live`) - process is up, no dependencies touched
 * - Version (`/health/version`) - build information
 */

use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, error};
use utoipa::ToSchema;

/// Basic health status
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

/// Health check detail
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthDetail {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Overall health information
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub details: HashMap<String, HealthDetail>,
}

/// Builds the health report, pinging the database
pub async fn collect_health(state: &AppState) -> HealthInfo {
    let database = match crate::db::check_connection(&state.db).await {
        Ok(()) => HealthDetail {
            status: HealthStatus::Up,
            message: None,
            timestamp: Utc::now(),
        },
        Err(e) => {
            error!("Database health check failed: {}", e);
            HealthDetail {
                status: HealthStatus::Down,
                message: Some("database unreachable".to_string()),
                timestamp: Utc::now(),
            }
        }
    };

    let status = database.status.clone();
    let mut details = HashMap::new();
    details.insert("database".to_string(), database);

    HealthInfo {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        details,
    }
}

/// Basic health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthInfo),
        (status = 503, description = "Database unreachable", body = HealthInfo)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Health check endpoint called");

    let health = collect_health(&state).await;
    let status_code = match health.status {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Liveness check endpoint
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "alive": true,
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}

/// Returns build and version information
pub async fn version_info() -> impl IntoResponse {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": env!("CARGO_PKG_NAME"),
    }))
}

/// Health routes, mounted at the root of the application router
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check))
        .route("/health/version", get(version_info))
}
