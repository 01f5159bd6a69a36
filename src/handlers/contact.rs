//! Contact form handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use super::extract::{AppJson, AppPath};
use crate::middleware::AdminUser;
use crate::models::{ContactMessage, CreateContactMessageRequest};
use crate::state::AppState;
use crate::utils::errors::{BakeshopError, Result};
use crate::utils::helpers::{normalize_email, optional_field, require_field, validate_phone};
use crate::utils::logging::log_admin_action;

/// Handle `POST /api/contact`
pub async fn send_message(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateContactMessageRequest>,
) -> Result<(StatusCode, Json<ContactMessage>)> {
    let request = CreateContactMessageRequest {
        name: require_field("name", &request.name)?,
        email: normalize_email(&request.email)?,
        phone: optional_field(request.phone).map(|p| validate_phone(&p)).transpose()?,
        subject: optional_field(request.subject),
        message: require_field("message", &request.message)?,
    };

    let message = state.db.messages.create(request).await?;
    info!(message_id = message.id, "Contact message received");
    Ok((StatusCode::CREATED, Json(message)))
}

/// Handle `GET /api/admin/messages`
pub async fn list_messages(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Vec<ContactMessage>>> {
    let messages = state.db.messages.list().await?;
    Ok(Json(messages))
}

/// Handle `PUT /api/admin/messages/:id/read`
pub async fn mark_read(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ContactMessage>> {
    let message = state
        .db
        .messages
        .mark_read(id)
        .await?
        .ok_or_else(|| BakeshopError::not_found("Message", id))?;
    Ok(Json(message))
}

/// Handle `DELETE /api/admin/messages/:id`
pub async fn delete_message(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode> {
    if !state.db.messages.delete(id).await? {
        return Err(BakeshopError::not_found("Message", id));
    }

    log_admin_action(admin.id(), "delete_message", Some(&id.to_string()), None);
    Ok(StatusCode::NO_CONTENT)
}
