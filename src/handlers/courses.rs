//! Course, course order and receipt handlers

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::extract::{AppJson, AppPath, AppQuery};
use super::uploads::read_upload;
use crate::middleware::{AdminUser, AuthUser};
use crate::models::{
    Course, CourseOrder, CourseOrderDetail, CourseOrderFilter, CourseSummary, CreateCourseOrderRequest,
    CreateCourseRequest, ReviewReceiptRequest, UpdateCourseRequest,
};
use crate::state::AppState;
use crate::utils::errors::{BakeshopError, Result};
use crate::utils::helpers::{optional_field, require_field};
use crate::utils::logging::log_admin_action;

/// Folder for payment receipts
pub const RECEIPT_FOLDER: &str = "receipts";

fn check_price(price_cents: i64) -> Result<()> {
    if price_cents < 0 {
        return Err(BakeshopError::InvalidInput("price_cents must not be negative".to_string()));
    }
    Ok(())
}

/// Handle `GET /api/courses`
pub async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<CourseSummary>>> {
    let courses = state.db.courses.list(true).await?;
    Ok(Json(courses.into_iter().map(CourseSummary::from).collect()))
}

/// Handle `GET /api/courses/:id`
pub async fn get_course(State(state): State<AppState>, AppPath(id): AppPath<i64>) -> Result<Json<CourseSummary>> {
    let course = state
        .db
        .courses
        .find_by_id(id)
        .await?
        .filter(|course| course.is_published)
        .ok_or_else(|| BakeshopError::not_found("Course", id))?;

    Ok(Json(course.into()))
}

/// Handle `GET /api/courses/:id/content`
pub async fn course_content(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Course>> {
    let course = state.services.course_order_service.course_content(&caller, id).await?;
    Ok(Json(course))
}

/// Handle `GET /api/my-courses`
pub async fn my_courses(State(state): State<AppState>, AuthUser(caller): AuthUser) -> Result<Json<Vec<Course>>> {
    let courses = state.services.course_order_service.my_courses(&caller).await?;
    Ok(Json(courses))
}

/// Handle `POST /api/course-orders`
pub async fn place_order(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppJson(request): AppJson<CreateCourseOrderRequest>,
) -> Result<(StatusCode, Json<CourseOrder>)> {
    let order = state.services.course_order_service.place_order(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Handle `GET /api/course-orders/mine`
pub async fn my_orders(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<CourseOrderDetail>>> {
    let orders = state.services.course_order_service.list_mine(&caller).await?;
    Ok(Json(orders))
}

/// Handle `POST /api/course-orders/:id/receipt`
///
/// Ownership and order status are checked before the file is sent to storage.
pub async fn upload_receipt(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppPath(id): AppPath<i64>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>)> {
    let orders = &state.services.course_order_service;
    orders.order_for_receipt(&caller, id).await?;

    let (file, _) = read_upload(multipart).await?;
    let stored = state
        .services
        .storage_service
        .upload(file.bytes, &file.filename, &file.content_type, Some(RECEIPT_FOLDER))
        .await?;

    let (order, receipt) = orders.submit_receipt(&caller, id, stored).await?;
    Ok((StatusCode::CREATED, Json(json!({ "order": order, "receipt": receipt }))))
}

/// Handle `GET /api/admin/course-orders[?status=]`
pub async fn list_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
    AppQuery(filter): AppQuery<CourseOrderFilter>,
) -> Result<Json<Vec<CourseOrderDetail>>> {
    let orders = state.services.course_order_service.list(filter.status).await?;
    Ok(Json(orders))
}

/// Handle `POST /api/admin/receipts/:id/verify`
pub async fn verify_receipt(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<i64>,
    body: Option<AppJson<ReviewReceiptRequest>>,
) -> Result<Json<Value>> {
    let admin_note = body.and_then(|AppJson(review)| review.admin_note);
    let (order, receipt, access) = state
        .services
        .course_order_service
        .verify_receipt(id, admin_note, admin.id())
        .await?;

    log_admin_action(admin.id(), "verify_receipt", Some(&id.to_string()), None);
    Ok(Json(json!({ "order": order, "receipt": receipt, "access": access })))
}

/// Handle `POST /api/admin/receipts/:id/reject`
pub async fn reject_receipt(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<i64>,
    body: Option<AppJson<ReviewReceiptRequest>>,
) -> Result<Json<Value>> {
    let admin_note = body.and_then(|AppJson(review)| review.admin_note);
    let (order, receipt) = state
        .services
        .course_order_service
        .reject_receipt(id, admin_note, admin.id())
        .await?;

    log_admin_action(admin.id(), "reject_receipt", Some(&id.to_string()), None);
    Ok(Json(json!({ "order": order, "receipt": receipt })))
}

/// Handle `GET /api/admin/courses`, drafts included
pub async fn admin_list_courses(State(state): State<AppState>, _admin: AdminUser) -> Result<Json<Vec<Course>>> {
    let courses = state.db.courses.list(false).await?;
    Ok(Json(courses))
}

/// Handle `POST /api/admin/courses`
pub async fn create_course(
    State(state): State<AppState>,
    admin: AdminUser,
    AppJson(request): AppJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>)> {
    check_price(request.price_cents)?;

    let request = CreateCourseRequest {
        title: require_field("title", &request.title)?,
        description: require_field("description", &request.description)?,
        image_url: optional_field(request.image_url),
        level: optional_field(request.level),
        ..request
    };

    let course = state.db.courses.create(request).await?;
    log_admin_action(admin.id(), "create_course", Some(&course.id.to_string()), Some(&course.title));
    Ok((StatusCode::CREATED, Json(course)))
}

/// Handle `PUT /api/admin/courses/:id`
pub async fn update_course(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<i64>,
    AppJson(request): AppJson<UpdateCourseRequest>,
) -> Result<Json<Course>> {
    if let Some(price_cents) = request.price_cents {
        check_price(price_cents)?;
    }

    let course = state
        .db
        .courses
        .update(id, request)
        .await?
        .ok_or_else(|| BakeshopError::not_found("Course", id))?;

    log_admin_action(admin.id(), "update_course", Some(&id.to_string()), None);
    Ok(Json(course))
}

/// Handle `DELETE /api/admin/courses/:id`
pub async fn delete_course(
    State(state): State<AppState>,
    admin: AdminUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode> {
    if !state.db.courses.delete(id).await? {
        return Err(BakeshopError::not_found("Course", id));
    }

    log_admin_action(admin.id(), "delete_course", Some(&id.to_string()), None);
    Ok(StatusCode::NO_CONTENT)
}
