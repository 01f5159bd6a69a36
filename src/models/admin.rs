//! Admin model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminSetting {
    pub id: i64,
    pub key: String,
    pub value: serde_json::Value,
    pub updated_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertAdminSettingRequest {
    pub value: serde_json::Value,
}

/// Dashboard counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stats {
    pub cake_orders: StatusCounts,
    pub course_orders: StatusCounts,
    pub reservations: StatusCounts,
    pub unread_messages: i64,
    pub gallery_items: i64,
    pub active_workshops: i64,
    pub published_courses: i64,
    pub users: i64,
}

/// Total plus a per-status breakdown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: i64,
    pub by_status: std::collections::BTreeMap<String, i64>,
}

impl StatusCounts {
    pub fn from_rows(rows: Vec<(String, i64)>) -> Self {
        let total = rows.iter().map(|(_, count)| count).sum();
        Self {
            total,
            by_status: rows.into_iter().collect(),
        }
    }
}
