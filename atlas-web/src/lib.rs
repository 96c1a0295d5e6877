pub mod config;
pub mod routes;

use std::sync::Arc;

use atlas_migrations::Migrator;
use atlas_shared::clients::db::DbPool;
use atlas_shared::middleware::metrics_middleware;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use routes::{health, not_found};

pub struct AppState {
    pub config: config::AppConfig,
    pub db: DbPool,
    pub migrator: Migrator,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/migrations", get(health::migration_status))
        .route("/metrics", get(health::metrics))
        .fallback(not_found::not_found)
        .layer(axum::middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
