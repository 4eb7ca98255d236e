//! HTTP API surface
//!
//! Route handlers mapping requests onto the resort directory and the
//! conditions service. JSON bodies mirror the browser client's wire format.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::conditions::ConditionsService;
use crate::error::ConditionsError;
use crate::models::{ConditionsSnapshot, ResortSummary};
use crate::resorts::ResortDirectory;

/// Shared handler state
#[derive(Clone)]
pub struct ApiState {
    pub directory: Arc<ResortDirectory>,
    pub conditions: Arc<ConditionsService>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/resorts", get(list_resorts))
        .route("/resorts/{slug}", get(get_resort))
        .route("/conditions/{resort_slug}", get(get_conditions))
        .with_state(state)
}

/// JSON error payload with an HTTP status
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.to_string(),
        }
    }
}

impl From<ConditionsError> for ApiError {
    fn from(err: ConditionsError) -> Self {
        match err {
            ConditionsError::ResortNotFound { .. } => Self::not_found("Resort not found"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Serialize)]
struct ResortsResponse {
    resorts: Vec<ResortSummary>,
}

#[derive(Serialize)]
struct ResortResponse {
    resort: ResortSummary,
}

#[derive(Serialize)]
struct ConditionsResponse {
    conditions: ConditionsSnapshot,
}

#[derive(Deserialize)]
struct ResortsQuery {
    state: Option<String>,
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn list_resorts(
    State(state): State<ApiState>,
    Query(query): Query<ResortsQuery>,
) -> Json<ResortsResponse> {
    let resorts = state.directory.all(query.state.as_deref());
    Json(ResortsResponse { resorts })
}

async fn get_resort(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Json<ResortResponse>, ApiError> {
    state
        .directory
        .by_slug(&slug)
        .cloned()
        .map(|resort| Json(ResortResponse { resort }))
        .ok_or_else(|| ApiError::not_found("Resort not found"))
}

async fn get_conditions(
    State(state): State<ApiState>,
    Path(resort_slug): Path<String>,
) -> Result<Json<ConditionsResponse>, ApiError> {
    let snapshot = state.conditions.conditions_for_resort(&resort_slug).await?;
    Ok(Json(ConditionsResponse {
        conditions: snapshot,
    }))
}
