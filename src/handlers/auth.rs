//! Sign-up, sign-in and session handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

use super::extract::AppJson;
use crate::middleware::AuthUser;
use crate::models::{AuthResponse, SignInRequest, SignUpRequest};
use crate::state::AppState;
use crate::utils::errors::Result;

/// Handle `POST /api/auth/sign-up`
pub async fn sign_up(
    State(state): State<AppState>,
    AppJson(request): AppJson<SignUpRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let response = state.services.auth_service.sign_up(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handle `POST /api/auth/sign-in`
pub async fn sign_in(
    State(state): State<AppState>,
    AppJson(request): AppJson<SignInRequest>,
) -> Result<Json<AuthResponse>> {
    let response = state.services.auth_service.sign_in(request).await?;
    Ok(Json(response))
}

/// Handle `POST /api/auth/sign-out`
pub async fn sign_out(State(state): State<AppState>, AuthUser(caller): AuthUser) -> Result<StatusCode> {
    state.services.auth_service.sign_out(&caller).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle `GET /api/auth/me`
pub async fn me(AuthUser(caller): AuthUser) -> Json<Value> {
    debug!(user_id = caller.user_id(), "Profile requested");
    Json(json!({
        "user": caller.user,
        "is_admin": caller.is_admin,
    }))
}

/// Handle `GET /api/auth/admin-status`
pub async fn admin_status(AuthUser(caller): AuthUser) -> Json<Value> {
    Json(json!({ "is_admin": caller.is_admin }))
}
