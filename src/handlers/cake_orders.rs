//! Custom cake order handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::AdminUser;
use crate::models::{CakeOrder, CakeOrderFilter, CreateCakeOrderRequest, UpdateCakeOrderStatusRequest};
use crate::state::AppState;
use crate::utils::errors::Result;

/// Handle `POST /api/cake-orders`
pub async fn create_order(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateCakeOrderRequest>,
) -> Result<(StatusCode, Json<CakeOrder>)> {
    let order = state.services.cake_order_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Handle `GET /api/admin/cake-orders[?status=]`
pub async fn list_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(filter): AppQuery<CakeOrderFilter>,
) -> Result<Json<Vec<CakeOrder>>> {
    let orders = state.services.cake_order_service.list(filter.status).await?;
    Ok(Json(orders))
}

/// Handle `GET /api/admin/cake-orders/:id`
pub async fn get_order(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<CakeOrder>> {
    let order = state.services.cake_order_service.get(id).await?;
    Ok(Json(order))
}

/// Handle `PUT /api/admin/cake-orders/:id/status`
pub async fn update_order_status(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateCakeOrderStatusRequest>,
) -> Result<Json<CakeOrder>> {
    let order = state
        .services
        .cake_order_service
        .update_status(id, request, admin.id())
        .await?;
    Ok(Json(order))
}

/// Handle `DELETE /api/admin/cake-orders/:id`
pub async fn delete_order(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode> {
    state.services.cake_order_service.delete(id, admin.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
