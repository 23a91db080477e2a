//! Health check endpoints for load balancers and container orchestration.
//!
//! `/health` is the liveness probe: it answers as long as the process can
//! serve HTTP and never touches the database. `/health/db` is the readiness
//! probe: it performs one round trip through the database pool under a
//! deadline and reports the outcome.

use axum::{extract::State, Json};

use crate::db::ping_with_deadline;
use crate::error::AppError;
use crate::health::{LivenessReport, ReadinessReport};
use crate::state::AppState;

/// Liveness handler. Always 200.
pub async fn health(State(state): State<AppState>) -> Json<LivenessReport> {
    Json(LivenessReport::now(&state.uptime))
}

/// Readiness handler. 200 when the database answered, 500 otherwise.
pub async fn database(State(state): State<AppState>) -> Result<Json<ReadinessReport>, AppError> {
    ping_with_deadline(state.db.as_ref(), state.db_check_timeout()).await?;
    tracing::debug!("Database health check passed");
    Ok(Json(ReadinessReport::connected()))
}
