use axum::{Json, extract::State, http::StatusCode};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use serde_json::Value;

use crate::state::AppState;

/// Readiness probe: verifies the database connection is alive.
pub async fn ready_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&state.db)
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    run_health_checks(checks).await
}
