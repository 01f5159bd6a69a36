//! Cake order repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::cake_order::{CakeOrder, CakeOrderStatus, CreateCakeOrderRequest};
use crate::utils::errors::BakeshopError;

const COLUMNS: &str = "id, customer_name, customer_email, customer_phone, event_date, size, shape, flavor, filling, decoration_notes, inscription, reference_image_urls, delivery_method, delivery_address, delivery_time, status, cancellation_reason, admin_notes, created_at, updated_at";

#[derive(Clone)]
pub struct CakeOrderRepository {
    pool: PgPool,
}

impl CakeOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new order; status starts at `pending`
    pub async fn create(&self, request: CreateCakeOrderRequest) -> Result<CakeOrder, BakeshopError> {
        let sql = format!(
            r#"
            INSERT INTO cake_orders (customer_name, customer_email, customer_phone, event_date, size, shape, flavor,
                                     filling, decoration_notes, inscription, reference_image_urls, delivery_method,
                                     delivery_address, delivery_time, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $16)
            RETURNING {COLUMNS}
            "#
        );

        let order = sqlx::query_as::<_, CakeOrder>(&sql)
            .bind(request.customer_name)
            .bind(request.customer_email)
            .bind(request.customer_phone)
            .bind(request.event_date)
            .bind(request.size)
            .bind(request.shape)
            .bind(request.flavor)
            .bind(request.filling)
            .bind(request.decoration_notes)
            .bind(request.inscription)
            .bind(request.reference_image_urls)
            .bind(request.delivery_method)
            .bind(request.delivery_address)
            .bind(request.delivery_time)
            .bind(CakeOrderStatus::Pending)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(order)
    }

    /// Find order by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<CakeOrder>, BakeshopError> {
        let sql = format!("SELECT {COLUMNS} FROM cake_orders WHERE id = $1");
        let order = sqlx::query_as::<_, CakeOrder>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// List orders, optionally by status, soonest event first
    pub async fn list(&self, status: Option<CakeOrderStatus>) -> Result<Vec<CakeOrder>, BakeshopError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM cake_orders WHERE ($1::cake_order_status IS NULL OR status = $1) ORDER BY event_date ASC, id ASC"
        );
        let orders = sqlx::query_as::<_, CakeOrder>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Move an order from `expected` to `status`.
    ///
    /// Returns `None` when the row no longer has the expected status.
    pub async fn update_status(
        &self,
        id: i64,
        expected: CakeOrderStatus,
        status: CakeOrderStatus,
        cancellation_reason: Option<String>,
        admin_notes: Option<String>,
    ) -> Result<Option<CakeOrder>, BakeshopError> {
        let sql = format!(
            r#"
            UPDATE cake_orders
            SET status = $3,
                cancellation_reason = CASE WHEN $3 = 'cancelled'::cake_order_status THEN $4 ELSE cancellation_reason END,
                admin_notes = COALESCE($5, admin_notes),
                updated_at = $6
            WHERE id = $1 AND status = $2
            RETURNING {COLUMNS}
            "#
        );

        let order = sqlx::query_as::<_, CakeOrder>(&sql)
            .bind(id)
            .bind(expected)
            .bind(status)
            .bind(cancellation_reason)
            .bind(admin_notes)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Delete order
    pub async fn delete(&self, id: i64) -> Result<bool, BakeshopError> {
        let result = sqlx::query("DELETE FROM cake_orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
