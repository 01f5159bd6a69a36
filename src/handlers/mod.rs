//! HTTP handlers
//!
//! This module wires every endpoint into one axum router. Admin handlers take
//! an [`AdminUser`](crate::middleware::AdminUser) extractor, customer handlers
//! an [`AuthUser`](crate::middleware::AuthUser).

pub mod admin;
pub mod auth;
pub mod availability;
pub mod cake_orders;
pub mod contact;
pub mod courses;
pub mod extract;
pub mod gallery;
pub mod health;
pub mod uploads;
pub mod workshops;

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post, put};
use axum::{middleware, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::config::ServerConfig;
use crate::middleware::{rate_limit, trace_layer};
use crate::state::AppState;

/// Multipart framing on top of the largest accepted file
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.settings.storage.max_upload_bytes + BODY_LIMIT_SLACK;
    let cors = cors_layer(&state.settings.server);

    Router::new()
        .merge(public_routes())
        .merge(throttled_routes(state.clone()))
        .merge(customer_routes())
        .nest("/api/admin", admin_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(trace_layer())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/gallery", get(gallery::list_items))
        .route("/api/gallery/:id", get(gallery::get_item))
        .route("/api/workshops", get(workshops::list_workshops))
        .route("/api/workshops/:id", get(workshops::get_workshop))
        .route("/api/courses", get(courses::list_courses))
        .route("/api/courses/:id", get(courses::get_course))
        .route("/api/unavailable-dates", get(availability::list_unavailable_dates))
        .route("/api/unavailable-dates/check", get(availability::check_date))
}

/// Anonymous submissions, throttled per client
fn throttled_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/sign-up", post(auth::sign_up))
        .route("/api/auth/sign-in", post(auth::sign_in))
        .route("/api/cake-orders", post(cake_orders::create_order))
        .route("/api/workshops/:id/reservations", post(workshops::reserve_seats))
        .route("/api/contact", post(contact::send_message))
        .route("/api/uploads/reference-image", post(uploads::upload_reference_image))
        .route_layer(middleware::from_fn_with_state(state, rate_limit))
}

fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/sign-out", post(auth::sign_out))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/admin-status", get(auth::admin_status))
        .route("/api/courses/:id/content", get(courses::course_content))
        .route("/api/course-orders", post(courses::place_order))
        .route("/api/course-orders/mine", get(courses::my_orders))
        .route("/api/course-orders/:id/receipt", post(courses::upload_receipt))
        .route("/api/my-courses", get(courses::my_courses))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/gallery", post(gallery::create_item))
        .route("/gallery/:id", put(gallery::update_item).delete(gallery::delete_item))
        .route("/workshops", get(workshops::admin_list_workshops).post(workshops::create_workshop))
        .route("/workshops/:id", put(workshops::update_workshop).delete(workshops::delete_workshop))
        .route("/reservations", get(workshops::list_reservations))
        .route("/reservations/:id", delete(workshops::delete_reservation))
        .route("/reservations/:id/status", put(workshops::update_reservation_status))
        .route("/courses", get(courses::admin_list_courses).post(courses::create_course))
        .route("/courses/:id", put(courses::update_course).delete(courses::delete_course))
        .route("/cake-orders", get(cake_orders::list_orders))
        .route("/cake-orders/:id", get(cake_orders::get_order).delete(cake_orders::delete_order))
        .route("/cake-orders/:id/status", put(cake_orders::update_order_status))
        .route("/course-orders", get(courses::list_orders))
        .route("/receipts/:id/verify", post(courses::verify_receipt))
        .route("/receipts/:id/reject", post(courses::reject_receipt))
        .route("/messages", get(contact::list_messages))
        .route("/messages/:id", delete(contact::delete_message))
        .route("/messages/:id/read", put(contact::mark_read))
        .route("/unavailable-dates", post(availability::add_unavailable_date))
        .route("/unavailable-dates/:id", delete(availability::remove_unavailable_date))
        .route("/settings", get(admin::list_settings))
        .route(
            "/settings/:key",
            get(admin::get_setting).put(admin::upsert_setting).delete(admin::delete_setting),
        )
        .route("/stats", get(admin::stats))
        .route("/admins", post(admin::grant_admin))
        .route("/uploads", post(uploads::upload_file))
        .route("/storage", get(uploads::list_files))
        .route("/storage/:storage_id", delete(uploads::delete_file))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins = if config.cors_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60))
}
