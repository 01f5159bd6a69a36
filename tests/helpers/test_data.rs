//! Test data helpers for building request bodies

use serde_json::{json, Value};

/// A valid pickup cake order for `event_date` (`YYYY-MM-DD`)
pub fn cake_order_body(event_date: &str) -> Value {
    json!({
        "customer_name": "Ana Baker",
        "customer_email": "ana@example.com",
        "customer_phone": "+1 555 0100",
        "event_date": event_date,
        "size": "8 inch",
        "shape": "round",
        "flavor": "vanilla",
        "filling": "raspberry",
        "inscription": "Happy birthday",
        "reference_image_urls": ["https://cdn.example.com/ref-1.png"],
        "delivery_method": "pickup"
    })
}

/// A published course with one lesson
pub fn course_body(title: &str, published: bool) -> Value {
    json!({
        "title": title,
        "description": "Learn to pipe, smooth and stack",
        "price_cents": 4900,
        "level": "beginner",
        "lessons": [
            { "title": "Crumb coat", "video_url": "https://videos.example.com/crumb", "duration_minutes": 12 }
        ],
        "is_published": published
    })
}

/// A workshop with `capacity` seats
pub fn workshop_body(capacity: i32) -> Value {
    json!({
        "title": "Sourdough Saturday",
        "description": "Shape and bake your own loaf",
        "workshop_date": "2025-11-15",
        "start_time": "10:00:00",
        "duration_minutes": 180,
        "price_cents": 6500,
        "capacity": capacity,
        "location": "Main kitchen"
    })
}

pub fn reservation_body(seats: i32) -> Value {
    json!({
        "participant_name": "Lee",
        "participant_email": "lee@example.com",
        "seats": seats
    })
}
