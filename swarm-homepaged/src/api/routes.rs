use std::sync::Arc;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use shared::protocol::{HEALTH_PATH, SERVICES_PATH};
use shared::types::ServiceRecord;
use crate::discovery::Discovery;

#[derive(Clone)]
pub struct AppState {
    pub discovery: Arc<Discovery>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(SERVICES_PATH, get(get_services))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}

/// Runs a full discovery cycle per request; nothing is cached between calls.
async fn get_services(State(state): State<AppState>) -> Json<Vec<ServiceRecord>> {
    Json(state.discovery.discover().await)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}
