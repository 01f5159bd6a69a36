//! Back-office handlers: settings, statistics and admin membership

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::extract::{AppJson, AppPath};
use crate::middleware::AdminUser;
use crate::models::{AdminSetting, GrantAdminRequest, Stats, UpsertAdminSettingRequest};
use crate::state::AppState;
use crate::utils::errors::{BakeshopError, Result};
use crate::utils::helpers::require_field;
use crate::utils::logging::log_admin_action;

/// Handle `GET /api/admin/settings`
pub async fn list_settings(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Vec<AdminSetting>>> {
    let settings = state.db.admin.list_settings().await?;
    Ok(Json(settings))
}

/// Handle `GET /api/admin/settings/:key`
pub async fn get_setting(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(key): AppPath<String>,
) -> Result<Json<AdminSetting>> {
    let setting = state
        .db
        .admin
        .get_setting(&key)
        .await?
        .ok_or_else(|| BakeshopError::not_found("Setting", &key))?;
    Ok(Json(setting))
}

/// Handle `PUT /api/admin/settings/:key`
pub async fn upsert_setting(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(key): AppPath<String>,
    AppJson(request): AppJson<UpsertAdminSettingRequest>,
) -> Result<Json<AdminSetting>> {
    let key = require_field("key", &key)?;
    let setting = state
        .db
        .admin
        .upsert_setting(&key, request.value, Some(admin.id()))
        .await?;

    log_admin_action(admin.id(), "upsert_setting", Some(&key), None);
    Ok(Json(setting))
}

/// Handle `DELETE /api/admin/settings/:key`
pub async fn delete_setting(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(key): AppPath<String>,
) -> Result<StatusCode> {
    if !state.db.admin.delete_setting(&key).await? {
        return Err(BakeshopError::not_found("Setting", &key));
    }

    log_admin_action(admin.id(), "delete_setting", Some(&key), None);
    Ok(StatusCode::NO_CONTENT)
}

/// Handle `GET /api/admin/stats`
pub async fn stats(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Stats>> {
    let stats = state.db.get_system_stats().await?;
    Ok(Json(stats))
}

/// Handle `POST /api/admin/admins`
pub async fn grant_admin(
    State(state): State<AppState>,
    admin: AdminUser,
    AppJson(request): AppJson<GrantAdminRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let user = state.services.auth_service.grant_admin(&request.email).await?;

    log_admin_action(admin.id(), "grant_admin", Some(&user.email), None);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "user_id": user.id, "email": user.email, "is_admin": true })),
    ))
}
