//! Unavailable date repository implementation
//!
//! Manual blocks live in `unavailable_dates`. Booked dates are never stored:
//! they are projected from `cake_orders` on every read.

use sqlx::PgPool;
use chrono::{NaiveDate, Utc};
use crate::models::availability::{ManualUnavailableDate, BookedDate, CreateUnavailableDateRequest};
use crate::utils::errors::BakeshopError;

#[derive(Clone)]
pub struct AvailabilityRepository {
    pool: PgPool,
}

impl AvailabilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a manual block
    pub async fn create_manual(&self, request: CreateUnavailableDateRequest, created_by: Option<i64>) -> Result<ManualUnavailableDate, BakeshopError> {
        let row = sqlx::query_as::<_, ManualUnavailableDate>(
            r#"
            INSERT INTO unavailable_dates (date, reason, created_by, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, date, reason, created_by, created_at
            "#
        )
        .bind(request.date)
        .bind(request.reason)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Delete a manual block. Orders are never touched.
    pub async fn delete_manual(&self, id: i64) -> Result<bool, BakeshopError> {
        let result = sqlx::query("DELETE FROM unavailable_dates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All manual blocks
    pub async fn list_manual(&self) -> Result<Vec<ManualUnavailableDate>, BakeshopError> {
        let rows = sqlx::query_as::<_, ManualUnavailableDate>(
            "SELECT id, date, reason, created_by, created_at FROM unavailable_dates ORDER BY date ASC, id ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Manual blocks for one day
    pub async fn list_manual_on(&self, date: NaiveDate) -> Result<Vec<ManualUnavailableDate>, BakeshopError> {
        let rows = sqlx::query_as::<_, ManualUnavailableDate>(
            "SELECT id, date, reason, created_by, created_at FROM unavailable_dates WHERE date = $1 ORDER BY id ASC"
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Event dates of every confirmed or in-progress cake order
    pub async fn list_booked(&self) -> Result<Vec<BookedDate>, BakeshopError> {
        let rows = sqlx::query_as::<_, BookedDate>(
            r#"
            SELECT id AS order_id, event_date
            FROM cake_orders
            WHERE status IN ('confirmed', 'in_progress')
            ORDER BY event_date ASC, id ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Blocking orders for one day
    pub async fn list_booked_on(&self, date: NaiveDate) -> Result<Vec<BookedDate>, BakeshopError> {
        let rows = sqlx::query_as::<_, BookedDate>(
            r#"
            SELECT id AS order_id, event_date
            FROM cake_orders
            WHERE event_date = $1 AND status IN ('confirmed', 'in_progress')
            ORDER BY id ASC
            "#
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
