//! Unavailable date model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Reason attached to every date derived from an active cake order
pub const BOOKED_REASON: &str = "Booked: custom cake order";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateOrigin {
    Manual,
    Booked,
}

/// One entry of the unavailable-dates listing.
///
/// Manual entries carry the `id` of their stored row; booked entries are
/// derived from orders and carry the `order_id` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableDate {
    pub id: Option<i64>,
    pub order_id: Option<i64>,
    pub date: NaiveDate,
    pub reason: String,
    pub origin: DateOrigin,
}

/// Stored admin-created block
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ManualUnavailableDate {
    pub id: i64,
    pub date: NaiveDate,
    pub reason: String,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Projection of a blocking cake order
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookedDate {
    pub order_id: i64,
    pub event_date: NaiveDate,
}

impl From<ManualUnavailableDate> for UnavailableDate {
    fn from(row: ManualUnavailableDate) -> Self {
        Self {
            id: Some(row.id),
            order_id: None,
            date: row.date,
            reason: row.reason,
            origin: DateOrigin::Manual,
        }
    }
}

impl From<BookedDate> for UnavailableDate {
    fn from(row: BookedDate) -> Self {
        Self {
            id: None,
            order_id: Some(row.order_id),
            date: row.event_date,
            reason: BOOKED_REASON.to_string(),
            origin: DateOrigin::Booked,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUnavailableDateRequest {
    pub date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateCheckQuery {
    pub date: String,
}

/// Answer to "can this date be booked?"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateAvailability {
    pub date: NaiveDate,
    pub available: bool,
    pub reasons: Vec<String>,
}
