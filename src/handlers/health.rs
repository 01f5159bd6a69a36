//! Health check handler

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;
use crate::utils::errors::Result;

/// Report liveness and database reachability
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>> {
    state.db.health_check().await?;

    Ok(Json(json!({
        "status": "ok",
        "version": crate::VERSION,
    })))
}
