//! Unavailable date handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::AdminUser;
use crate::models::{CreateUnavailableDateRequest, DateAvailability, DateCheckQuery, UnavailableDate};
use crate::state::AppState;
use crate::utils::errors::Result;
use crate::utils::helpers::parse_date;
use crate::utils::logging::log_admin_action;

/// Handle `GET /api/unavailable-dates`
pub async fn list_unavailable_dates(State(state): State<AppState>) -> Result<Json<Vec<UnavailableDate>>> {
    let dates = state.services.availability_service.list().await?;
    Ok(Json(dates))
}

/// Handle `GET /api/unavailable-dates/check?date=YYYY-MM-DD`
pub async fn check_date(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<DateCheckQuery>,
) -> Result<Json<DateAvailability>> {
    let date = parse_date(&query.date)?;
    let availability = state.services.availability_service.check(date).await?;
    Ok(Json(availability))
}

/// Handle `POST /api/admin/unavailable-dates`
pub async fn add_unavailable_date(
    State(state): State<AppState>,
    admin: AdminUser,
    AppJson(request): AppJson<CreateUnavailableDateRequest>,
) -> Result<(StatusCode, Json<UnavailableDate>)> {
    let entry = state
        .services
        .availability_service
        .add_manual(request, admin.id())
        .await?;

    log_admin_action(admin.id(), "block_date", Some(&entry.date.to_string()), Some(&entry.reason));
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Handle `DELETE /api/admin/unavailable-dates/:id`
pub async fn remove_unavailable_date(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode> {
    state.services.availability_service.remove_manual(id).await?;

    log_admin_action(admin.id(), "unblock_date", Some(&id.to_string()), None);
    Ok(StatusCode::NO_CONTENT)
}
