//! Material Wastage API Library
//!
//! Tracks material dispatched to external companies, the batches returned
//! against each dispatch, and the wastage percentage derived from them.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod reports;
pub mod services;
pub mod tracing;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    /// Wires every service to the shared pool
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }
}

async fn banner() -> &'static str {
    "Material wastage API is running"
}

/// Every public route, without state or cross-cutting layers
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .merge(handlers::materials::materials_routes())
        .merge(handlers::batch_returns::batch_returns_routes())
        .merge(handlers::reports::reports_routes())
        .merge(health::health_routes())
}

/// Application router: routes, OpenAPI docs, request ids and HTTP tracing
pub fn build_router(state: AppState) -> Router {
    app_routes()
        .with_state(state)
        .merge(openapi::swagger_ui())
        .layer(crate::tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
}
