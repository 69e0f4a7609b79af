/// Health check endpoint
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use taskhub_shared::db::pool;

use crate::app::AppState;
use crate::error::ApiError;

/// GET /health
///
/// Verifies database connectivity and reports the running version.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    pool::health_check(state.store.pool()).await?;

    Ok(Json(json!({
        "status": "healthy",
        "version": taskhub_shared::VERSION,
    })))
}
