//! Workshop and reservation handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use super::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::AdminUser;
use crate::models::{
    CreateReservationRequest, CreateWorkshopRequest, ReservationFilter, UpdateReservationStatusRequest,
    UpdateWorkshopRequest, Workshop, WorkshopReservation, WorkshopWithSeats,
};
use crate::state::AppState;
use crate::utils::errors::{BakeshopError, Result};
use crate::utils::helpers::{normalize_email, optional_field, require_field, validate_phone};
use crate::utils::logging::log_admin_action;

fn check_capacity(capacity: i32) -> Result<()> {
    if capacity < 1 {
        return Err(BakeshopError::InvalidInput("capacity must be at least 1".to_string()));
    }
    Ok(())
}

fn check_price(price_cents: i64) -> Result<()> {
    if price_cents < 0 {
        return Err(BakeshopError::InvalidInput("price_cents must not be negative".to_string()));
    }
    Ok(())
}

async fn with_seats(state: &AppState, workshop: Workshop) -> Result<WorkshopWithSeats> {
    let reserved = state.db.workshops.reserved_seats(workshop.id).await?;
    let seats_remaining = (workshop.capacity as i64 - reserved).max(0);
    Ok(WorkshopWithSeats { workshop, seats_remaining })
}

async fn all_with_seats(state: &AppState, active_only: bool) -> Result<Vec<WorkshopWithSeats>> {
    let workshops = state.db.workshops.list(active_only).await?;
    let mut listed = Vec::with_capacity(workshops.len());
    for workshop in workshops {
        listed.push(with_seats(state, workshop).await?);
    }
    Ok(listed)
}

/// Handle `GET /api/workshops`
pub async fn list_workshops(State(state): State<AppState>) -> Result<Json<Vec<WorkshopWithSeats>>> {
    Ok(Json(all_with_seats(&state, true).await?))
}

/// Handle `GET /api/workshops/:id`
pub async fn get_workshop(State(state): State<AppState>, AppPath(id): AppPath<i64>) -> Result<Json<WorkshopWithSeats>> {
    let workshop = state
        .db
        .workshops
        .find_by_id(id)
        .await?
        .filter(|workshop| workshop.is_active)
        .ok_or_else(|| BakeshopError::not_found("Workshop", id))?;

    Ok(Json(with_seats(&state, workshop).await?))
}

/// Handle `POST /api/workshops/:id/reservations`
pub async fn reserve_seats(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<WorkshopReservation>)> {
    if request.seats < 1 {
        return Err(BakeshopError::InvalidInput("seats must be at least 1".to_string()));
    }

    let request = CreateReservationRequest {
        participant_name: require_field("participant_name", &request.participant_name)?,
        participant_email: normalize_email(&request.participant_email)?,
        participant_phone: optional_field(request.participant_phone)
            .map(|p| validate_phone(&p))
            .transpose()?,
        seats: request.seats,
        notes: optional_field(request.notes),
    };

    let reservation = state.db.workshops.create_reservation(id, request).await?;
    info!(reservation_id = reservation.id, workshop_id = id, seats = reservation.seats, "Workshop seats reserved");
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Handle `GET /api/admin/workshops`, including inactive ones
pub async fn admin_list_workshops(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<WorkshopWithSeats>>> {
    Ok(Json(all_with_seats(&state, false).await?))
}

/// Handle `POST /api/admin/workshops`
pub async fn create_workshop(
    State(state): State<AppState>,
    admin: AdminUser,
    AppJson(request): AppJson<CreateWorkshopRequest>,
) -> Result<(StatusCode, Json<Workshop>)> {
    check_capacity(request.capacity)?;
    check_price(request.price_cents)?;

    let request = CreateWorkshopRequest {
        title: require_field("title", &request.title)?,
        description: require_field("description", &request.description)?,
        location: optional_field(request.location),
        image_url: optional_field(request.image_url),
        ..request
    };

    let workshop = state.db.workshops.create(request).await?;
    log_admin_action(admin.id(), "create_workshop", Some(&workshop.id.to_string()), Some(&workshop.title));
    Ok((StatusCode::CREATED, Json(workshop)))
}

/// Handle `PUT /api/admin/workshops/:id`
pub async fn update_workshop(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateWorkshopRequest>,
) -> Result<Json<Workshop>> {
    if let Some(capacity) = request.capacity {
        check_capacity(capacity)?;
    }
    if let Some(price_cents) = request.price_cents {
        check_price(price_cents)?;
    }

    let workshop = state
        .db
        .workshops
        .update(id, request)
        .await?
        .ok_or_else(|| BakeshopError::not_found("Workshop", id))?;

    log_admin_action(admin.id(), "update_workshop", Some(&id.to_string()), None);
    Ok(Json(workshop))
}

/// Handle `DELETE /api/admin/workshops/:id`
pub async fn delete_workshop(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode> {
    if !state.db.workshops.delete(id).await? {
        return Err(BakeshopError::not_found("Workshop", id));
    }

    log_admin_action(admin.id(), "delete_workshop", Some(&id.to_string()), None);
    Ok(StatusCode::NO_CONTENT)
}

/// Handle `GET /api/admin/reservations[?workshop_id=]`
pub async fn list_reservations(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(filter): AppQuery<ReservationFilter>,
) -> Result<Json<Vec<WorkshopReservation>>> {
    let reservations = state.db.workshops.list_reservations(filter.workshop_id).await?;
    Ok(Json(reservations))
}

/// Handle `PUT /api/admin/reservations/:id/status`
pub async fn update_reservation_status(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateReservationStatusRequest>,
) -> Result<Json<WorkshopReservation>> {
    let reservation = state
        .db
        .workshops
        .update_reservation_status(id, request.status)
        .await?
        .ok_or_else(|| BakeshopError::not_found("Reservation", id))?;

    log_admin_action(
        admin.id(),
        "update_reservation_status",
        Some(&id.to_string()),
        Some(&format!("{:?}", reservation.status)),
    );
    Ok(Json(reservation))
}

/// Handle `DELETE /api/admin/reservations/:id`
pub async fn delete_reservation(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode> {
    if !state.db.workshops.delete_reservation(id).await? {
        return Err(BakeshopError::not_found("Reservation", id));
    }

    log_admin_action(admin.id(), "delete_reservation", Some(&id.to_string()), None);
    Ok(StatusCode::NO_CONTENT)
}
