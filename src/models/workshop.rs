//! Workshop and reservation models

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workshop {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub workshop_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
    pub price_cents: i64,
    pub capacity: i32,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkshopRequest {
    pub title: String,
    pub description: String,
    pub workshop_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
    pub price_cents: i64,
    pub capacity: i32,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWorkshopRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub workshop_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
    pub price_cents: Option<i64>,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Workshop with the number of seats still open
#[derive(Debug, Clone, Serialize)]
pub struct WorkshopWithSeats {
    #[serde(flatten)]
    pub workshop: Workshop,
    pub seats_remaining: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkshopReservation {
    pub id: i64,
    pub workshop_id: i64,
    pub participant_name: String,
    pub participant_email: String,
    pub participant_phone: Option<String>,
    pub seats: i32,
    pub notes: Option<String>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub participant_name: String,
    pub participant_email: String,
    pub participant_phone: Option<String>,
    #[serde(default = "default_seats")]
    pub seats: i32,
    pub notes: Option<String>,
}

fn default_seats() -> i32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReservationStatusRequest {
    pub status: ReservationStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationFilter {
    pub workshop_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seats_default_to_one() {
        let request: CreateReservationRequest = serde_json::from_value(serde_json::json!({
            "participant_name": "Lee",
            "participant_email": "lee@example.com"
        }))
        .unwrap();
        assert_eq!(request.seats, 1);
    }
}
