//! API status and readiness

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use serde_json::{Value, json};

use crate::state::AppState;

/// `GET /` and `GET /ready`, relative to the API prefix
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api_status))
        .route("/ready", get(readiness_check))
        .with_state(state)
}

async fn api_status() -> Json<Value> {
    Json(json!({ "status": "api works" }))
}

/// Ready once the store answers a ping
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.as_ref();
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "database",
        Box::pin(async move { store.ping().await.map_err(|e| e.to_string()) }),
    )];

    run_health_checks(checks).await
}
