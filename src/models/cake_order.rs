//! Custom cake order model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "cake_order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CakeOrderStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl CakeOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CakeOrderStatus::Pending => "pending",
            CakeOrderStatus::Confirmed => "confirmed",
            CakeOrderStatus::InProgress => "in_progress",
            CakeOrderStatus::Completed => "completed",
            CakeOrderStatus::Cancelled => "cancelled",
        }
    }

    /// Orders in these states block their event date
    pub fn blocks_date(&self) -> bool {
        matches!(self, CakeOrderStatus::Confirmed | CakeOrderStatus::InProgress)
    }
}

impl std::fmt::Display for CakeOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "delivery_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Pickup,
    Delivery,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CakeOrder {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub event_date: NaiveDate,
    pub size: String,
    pub shape: String,
    pub flavor: String,
    pub filling: Option<String>,
    pub decoration_notes: Option<String>,
    pub inscription: Option<String>,
    pub reference_image_urls: Vec<String>,
    pub delivery_method: DeliveryMethod,
    pub delivery_address: Option<String>,
    pub delivery_time: Option<String>,
    pub status: CakeOrderStatus,
    pub cancellation_reason: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCakeOrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub event_date: NaiveDate,
    pub size: String,
    pub shape: String,
    pub flavor: String,
    pub filling: Option<String>,
    pub decoration_notes: Option<String>,
    pub inscription: Option<String>,
    #[serde(default)]
    pub reference_image_urls: Vec<String>,
    pub delivery_method: DeliveryMethod,
    pub delivery_address: Option<String>,
    pub delivery_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCakeOrderStatusRequest {
    pub status: CakeOrderStatus,
    pub cancellation_reason: Option<String>,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CakeOrderFilter {
    pub status: Option<CakeOrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_value(CakeOrderStatus::InProgress).unwrap(), "in_progress");
        let status: CakeOrderStatus = serde_json::from_str("\"confirmed\"").unwrap();
        assert_eq!(status, CakeOrderStatus::Confirmed);
    }

    #[test]
    fn test_blocking_statuses() {
        assert!(CakeOrderStatus::Confirmed.blocks_date());
        assert!(CakeOrderStatus::InProgress.blocks_date());
        assert!(!CakeOrderStatus::Pending.blocks_date());
        assert!(!CakeOrderStatus::Completed.blocks_date());
        assert!(!CakeOrderStatus::Cancelled.blocks_date());
    }

    #[test]
    fn test_reference_images_default_to_empty() {
        let request: CreateCakeOrderRequest = serde_json::from_value(serde_json::json!({
            "customer_name": "Ana",
            "customer_email": "ana@example.com",
            "customer_phone": "555-0100",
            "event_date": "2025-12-26",
            "size": "8 inch",
            "shape": "round",
            "flavor": "vanilla",
            "delivery_method": "pickup"
        }))
        .unwrap();
        assert!(request.reference_image_urls.is_empty());
        assert_eq!(request.delivery_method, DeliveryMethod::Pickup);
    }
}
