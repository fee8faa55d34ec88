use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{RecommendationRecord, UserQuery},
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub clusters: usize,
    pub destinations: usize,
}

/// Root banner
pub async fn home() -> &'static str {
    "Tour recommender is running."
}

/// Browsers ask for a favicon; there is none
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        clusters: state.context.cluster_count(),
        destinations: state.context.destination_count(),
    })
}

/// Recommends destinations for a cluster, age, gender and spending profile
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Vec<RecommendationRecord>>> {
    let Json(body) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    tracing::info!(request_id = %request_id, payload = %body, "Recommendation request received");

    let query = UserQuery::from_json(&body)?;
    let records = state.context.recommend(&query)?;

    tracing::info!(
        request_id = %request_id,
        cluster = query.cluster,
        records = records.len(),
        "Recommendation response sent"
    );

    Ok(Json(records))
}
