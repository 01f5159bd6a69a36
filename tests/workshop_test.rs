//! Workshop seat reservations

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use serial_test::serial;

use helpers::*;

#[tokio::test]
#[serial]
async fn test_reservations_respect_capacity() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;

    let (status, workshop) = ctx.post("/api/admin/workshops", Some(&admin), workshop_body(3)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = workshop["id"].as_i64().unwrap();
    let reserve_uri = format!("/api/workshops/{}/reservations", id);

    let (status, _) = ctx.post(&reserve_uri, None, reservation_body(2)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = ctx.post(&reserve_uri, None, reservation_body(2)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = ctx.post(&reserve_uri, None, reservation_body(0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx.get(&format!("/api/workshops/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seats_remaining"], json!(1));

    assert_eq!(ctx.database.as_ref().unwrap().count_records("workshop_reservations").await.unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn test_inactive_workshops_are_hidden() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;

    let (_, workshop) = ctx.post("/api/admin/workshops", Some(&admin), workshop_body(10)).await;
    let id = workshop["id"].as_i64().unwrap();

    let (status, _) = ctx
        .put(&format!("/api/admin/workshops/{}", id), Some(&admin), json!({ "is_active": false }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, public) = ctx.get("/api/workshops", None).await;
    assert!(public.as_array().unwrap().is_empty());

    let (_, all) = ctx.get("/api/admin/workshops", Some(&admin)).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, _) = ctx.post(&format!("/api/workshops/{}/reservations", id), None, reservation_body(1)).await;
    assert_ne!(status, StatusCode::CREATED);
}

#[tokio::test]
#[serial]
async fn test_reinstating_a_cancelled_reservation_respects_capacity() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;

    let (_, workshop) = ctx.post("/api/admin/workshops", Some(&admin), workshop_body(3)).await;
    let id = workshop["id"].as_i64().unwrap();
    let reserve_uri = format!("/api/workshops/{}/reservations", id);

    let (_, first) = ctx.post(&reserve_uri, None, reservation_body(2)).await;
    let first_status_uri = format!("/api/admin/reservations/{}/status", first["id"].as_i64().unwrap());
    let (status, _) = ctx.put(&first_status_uri, Some(&admin), json!({ "status": "cancelled" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = ctx.post(&reserve_uri, None, reservation_body(3)).await;
    assert_eq!(status, StatusCode::CREATED);

    // Two seats would be claimed again with none left
    let (status, body) = ctx.put(&first_status_uri, Some(&admin), json!({ "status": "confirmed" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, reservations) = ctx
        .get(&format!("/api/admin/reservations?workshop_id={}", id), Some(&admin))
        .await;
    let first_row = reservations
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["id"] == first["id"])
        .unwrap();
    assert_eq!(first_row["status"], json!("cancelled"));

    let (_, public) = ctx.get(&format!("/api/workshops/{}", id), None).await;
    assert_eq!(public["seats_remaining"], json!(0));

    // Once the seats are free again the reservation can come back
    let second_status_uri = format!("/api/admin/reservations/{}/status", second["id"].as_i64().unwrap());
    ctx.put(&second_status_uri, Some(&admin), json!({ "status": "cancelled" })).await;

    let (status, body) = ctx.put(&first_status_uri, Some(&admin), json!({ "status": "confirmed" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("confirmed"));

    let (_, public) = ctx.get(&format!("/api/workshops/{}", id), None).await;
    assert_eq!(public["seats_remaining"], json!(1));
}
