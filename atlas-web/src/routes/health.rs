use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use atlas_migrations::MigrationStatus;
use atlas_shared::{AppError, HealthCheck, HealthResponse};
use diesel::RunQueryDsl;
use std::sync::Arc;

use crate::AppState;

/// Probes the database and reports whether the schema is current.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let checks = match state.db.get() {
        Ok(mut conn) => {
            let database = match diesel::sql_query("SELECT 1").execute(&mut *conn) {
                Ok(_) => HealthCheck::healthy("database"),
                Err(e) => HealthCheck::unhealthy("database", e.to_string()),
            };
            let migrations = match state.migrator.pending(&mut *conn) {
                Ok(pending) if pending.is_empty() => HealthCheck::healthy("migrations"),
                Ok(pending) => {
                    let versions: Vec<String> = pending.iter().map(|m| m.version().to_string()).collect();
                    HealthCheck::degraded("migrations", format!("pending: {}", versions.join(", ")))
                }
                Err(e) => HealthCheck::degraded("migrations", e.to_string()),
            };
            vec![database, migrations]
        }
        Err(e) => {
            tracing::warn!(error = %e, "health check could not get a connection");
            vec![HealthCheck::unhealthy("database", e.to_string())]
        }
    };

    let response = HealthResponse::healthy("atlas-web", env!("CARGO_PKG_VERSION")).with_checks(checks);
    (response.http_status(), Json(response)).into_response()
}

/// Lists every migration with its applied state.
pub async fn migration_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MigrationStatus>>, AppError> {
    let mut conn = state
        .db
        .get()
        .map_err(|e| AppError::service_unavailable(e.to_string()))?;
    let status = state.migrator.status(&mut *conn)?;
    Ok(Json(status))
}

/// Returns Prometheus metrics.
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics_handle.render()
}
