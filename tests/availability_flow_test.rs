//! Date availability as manual blocks and cake orders move through their lifecycle

mod helpers;

use axum::http::StatusCode;
use serde_json::{json, Value};
use serial_test::serial;

use bakeshop::models::BOOKED_REASON;
use helpers::*;

fn entries_on<'a>(listing: &'a Value, date: &str) -> Vec<&'a Value> {
    listing
        .as_array()
        .expect("listing is an array")
        .iter()
        .filter(|entry| entry["date"] == json!(date))
        .collect()
}

#[tokio::test]
#[serial]
async fn test_manual_and_booked_dates() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;

    let (status, holiday) = ctx
        .post(
            "/api/admin/unavailable-dates",
            Some(&admin),
            json!({ "date": "2025-12-25", "reason": "Holiday" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, order) = ctx.post("/api/cake-orders", None, cake_order_body("2025-12-26")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], json!("pending"));
    let order_id = order["id"].as_i64().unwrap();

    // A pending order does not block its date
    let (_, listing) = ctx.get("/api/unavailable-dates", None).await;
    let manual = entries_on(&listing, "2025-12-25");
    assert_eq!(manual.len(), 1);
    assert_eq!(manual[0]["reason"], json!("Holiday"));
    assert!(entries_on(&listing, "2025-12-26").is_empty());

    let (status, _) = ctx
        .put(
            &format!("/api/admin/cake-orders/{}/status", order_id),
            Some(&admin),
            json!({ "status": "confirmed" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listing) = ctx.get("/api/unavailable-dates", None).await;
    let booked = entries_on(&listing, "2025-12-26");
    assert_eq!(booked.len(), 1);
    assert_eq!(booked[0]["reason"], json!(BOOKED_REASON));
    assert_eq!(booked[0]["order_id"], json!(order_id));

    let (_, check) = ctx.get("/api/unavailable-dates/check?date=2025-12-26", None).await;
    assert_eq!(check["available"], json!(false));

    // Removing the manual block leaves the booked date in place
    let (status, _) = ctx
        .delete(
            &format!("/api/admin/unavailable-dates/{}", holiday["id"].as_i64().unwrap()),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listing) = ctx.get("/api/unavailable-dates", None).await;
    assert!(entries_on(&listing, "2025-12-25").is_empty());
    assert_eq!(entries_on(&listing, "2025-12-26").len(), 1);
}

#[tokio::test]
#[serial]
async fn test_orders_on_unavailable_dates_are_rejected() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;

    ctx.post(
        "/api/admin/unavailable-dates",
        Some(&admin),
        json!({ "date": "2025-12-25", "reason": "Holiday" }),
    )
    .await;

    let (status, body) = ctx.post("/api/cake-orders", None, cake_order_body("2025-12-25")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, check) = ctx.get("/api/unavailable-dates/check?date=2025-12-25", None).await;
    assert_eq!(check["available"], json!(false));
    assert_eq!(check["reasons"], json!(["Holiday"]));

    let (_, check) = ctx.get("/api/unavailable-dates/check?date=2025-12-27", None).await;
    assert_eq!(check["available"], json!(true));
}

#[tokio::test]
#[serial]
async fn test_order_lifecycle_rules() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;

    let (_, order) = ctx.post("/api/cake-orders", None, cake_order_body("2025-12-26")).await;
    let status_uri = format!("/api/admin/cake-orders/{}/status", order["id"].as_i64().unwrap());

    let (status, _) = ctx.put(&status_uri, Some(&admin), json!({ "status": "completed" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    ctx.put(&status_uri, Some(&admin), json!({ "status": "confirmed" })).await;

    let (status, _) = ctx.put(&status_uri, Some(&admin), json!({ "status": "confirmed" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx.put(&status_uri, Some(&admin), json!({ "status": "cancelled" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("cancellation_reason"));

    let (status, body) = ctx
        .put(
            &status_uri,
            Some(&admin),
            json!({ "status": "cancelled", "cancellation_reason": "Customer called" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("cancelled"));
    assert_eq!(body["cancellation_reason"], json!("Customer called"));

    // Cancelling frees the date again
    let (_, check) = ctx.get("/api/unavailable-dates/check?date=2025-12-26", None).await;
    assert_eq!(check["available"], json!(true));

    let (status, _) = ctx.put(&status_uri, Some(&admin), json!({ "status": "pending" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

async fn confirmed_order_on(ctx: &TestContext, admin: &str, date: &str) -> i64 {
    let (status, order) = ctx.post("/api/cake-orders", None, cake_order_body(date)).await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = order["id"].as_i64().unwrap();

    let (status, _) = ctx
        .put(
            &format!("/api/admin/cake-orders/{}/status", order_id),
            Some(admin),
            json!({ "status": "confirmed" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    order_id
}

#[tokio::test]
#[serial]
async fn test_removing_manual_block_keeps_booking_on_same_day() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;

    let order_id = confirmed_order_on(&ctx, &admin, "2025-12-20").await;
    let (_, manual) = ctx
        .post(
            "/api/admin/unavailable-dates",
            Some(&admin),
            json!({ "date": "2025-12-20", "reason": "Staff training" }),
        )
        .await;

    let (_, listing) = ctx.get("/api/unavailable-dates", None).await;
    let entries = entries_on(&listing, "2025-12-20");
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().any(|e| e["origin"] == json!("manual")));
    assert!(entries.iter().any(|e| e["origin"] == json!("booked")));

    let (status, _) = ctx
        .delete(
            &format!("/api/admin/unavailable-dates/{}", manual["id"].as_i64().unwrap()),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listing) = ctx.get("/api/unavailable-dates", None).await;
    let entries = entries_on(&listing, "2025-12-20");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["origin"], json!("booked"));
    assert_eq!(entries[0]["order_id"], json!(order_id));
}

#[tokio::test]
#[serial]
async fn test_releasing_booking_keeps_manual_block_on_same_day() {
    let ctx = TestContext::new().await;
    let admin = ctx.admin_token().await;

    let order_id = confirmed_order_on(&ctx, &admin, "2025-12-20").await;
    let (_, manual) = ctx
        .post(
            "/api/admin/unavailable-dates",
            Some(&admin),
            json!({ "date": "2025-12-20", "reason": "Staff training" }),
        )
        .await;

    let (status, _) = ctx
        .put(
            &format!("/api/admin/cake-orders/{}/status", order_id),
            Some(&admin),
            json!({ "status": "cancelled", "cancellation_reason": "Venue closed" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listing) = ctx.get("/api/unavailable-dates", None).await;
    let entries = entries_on(&listing, "2025-12-20");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["origin"], json!("manual"));
    assert_eq!(entries[0]["id"], manual["id"]);

    let (_, check) = ctx.get("/api/unavailable-dates/check?date=2025-12-20", None).await;
    assert_eq!(check["available"], json!(false));
    assert_eq!(check["reasons"], json!(["Staff training"]));
}
