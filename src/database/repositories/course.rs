//! Course, course order, receipt and access repository implementation

use sqlx::PgPool;
use sqlx::types::Json;
use chrono::Utc;
use crate::models::course::{
    Course, CreateCourseRequest, UpdateCourseRequest, CourseOrder, CourseOrderStatus,
    PaymentReceipt, ReceiptStatus, CreateReceiptRequest, CourseAccess,
};
use crate::utils::errors::BakeshopError;

const COURSE_COLUMNS: &str = "id, title, description, price_cents, image_url, level, lessons, is_published, created_at, updated_at";
const ORDER_COLUMNS: &str = "id, user_id, course_id, course_name, amount_cents, payment_method, status, created_at, updated_at";
const RECEIPT_COLUMNS: &str = "id, order_id, user_id, file_url, storage_id, status, admin_note, uploaded_at, reviewed_at";

#[derive(Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Course methods
    /// Create a new course
    pub async fn create(&self, request: CreateCourseRequest) -> Result<Course, BakeshopError> {
        let sql = format!(
            r#"
            INSERT INTO courses (title, description, price_cents, image_url, level, lessons, is_published, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING {COURSE_COLUMNS}
            "#
        );

        let course = sqlx::query_as::<_, Course>(&sql)
            .bind(request.title)
            .bind(request.description)
            .bind(request.price_cents)
            .bind(request.image_url)
            .bind(request.level)
            .bind(Json(request.lessons))
            .bind(request.is_published)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(course)
    }

    /// Find course by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Course>, BakeshopError> {
        let sql = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1");
        let course = sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(course)
    }

    /// List courses; `published_only` hides drafts
    pub async fn list(&self, published_only: bool) -> Result<Vec<Course>, BakeshopError> {
        let sql = format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE ($1 = false OR is_published = true) ORDER BY created_at DESC"
        );
        let courses = sqlx::query_as::<_, Course>(&sql)
            .bind(published_only)
            .fetch_all(&self.pool)
            .await?;

        Ok(courses)
    }

    /// Update course
    pub async fn update(&self, id: i64, request: UpdateCourseRequest) -> Result<Option<Course>, BakeshopError> {
        let sql = format!(
            r#"
            UPDATE courses
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                price_cents = COALESCE($4, price_cents),
                image_url = COALESCE($5, image_url),
                level = COALESCE($6, level),
                lessons = COALESCE($7, lessons),
                is_published = COALESCE($8, is_published),
                updated_at = $9
            WHERE id = $1
            RETURNING {COURSE_COLUMNS}
            "#
        );

        let course = sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .bind(request.title)
            .bind(request.description)
            .bind(request.price_cents)
            .bind(request.image_url)
            .bind(request.level)
            .bind(request.lessons.map(Json))
            .bind(request.is_published)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        Ok(course)
    }

    /// Delete course
    pub async fn delete(&self, id: i64) -> Result<bool, BakeshopError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => BakeshopError::InvalidInput(
                    format!("Course {} has orders and cannot be deleted; unpublish it instead", id),
                ),
                other => other.into(),
            })?;

        Ok(result.rows_affected() > 0)
    }

    // Course order methods
    /// Create a pending order priced from the course
    pub async fn create_order(&self, user_id: i64, course: &Course, payment_method: &str) -> Result<CourseOrder, BakeshopError> {
        let sql = format!(
            r#"
            INSERT INTO course_orders (user_id, course_id, course_name, amount_cents, payment_method, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let order = sqlx::query_as::<_, CourseOrder>(&sql)
            .bind(user_id)
            .bind(course.id)
            .bind(&course.title)
            .bind(course.price_cents)
            .bind(payment_method)
            .bind(CourseOrderStatus::Pending)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(order)
    }

    /// Find order by ID
    pub async fn find_order(&self, id: i64) -> Result<Option<CourseOrder>, BakeshopError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM course_orders WHERE id = $1");
        let order = sqlx::query_as::<_, CourseOrder>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// List orders, optionally by status
    pub async fn list_orders(&self, status: Option<CourseOrderStatus>) -> Result<Vec<CourseOrder>, BakeshopError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM course_orders WHERE ($1::course_order_status IS NULL OR status = $1) ORDER BY created_at DESC"
        );
        let orders = sqlx::query_as::<_, CourseOrder>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Orders placed by one user
    pub async fn list_user_orders(&self, user_id: i64) -> Result<Vec<CourseOrder>, BakeshopError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM course_orders WHERE user_id = $1 ORDER BY created_at DESC");
        let orders = sqlx::query_as::<_, CourseOrder>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    // Receipt methods
    /// Store a receipt and mark its order paid
    pub async fn submit_receipt(&self, request: CreateReceiptRequest) -> Result<(CourseOrder, PaymentReceipt), BakeshopError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let receipt_sql = format!(
            r#"
            INSERT INTO payment_receipts (order_id, user_id, file_url, storage_id, status, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RECEIPT_COLUMNS}
            "#
        );
        let receipt = sqlx::query_as::<_, PaymentReceipt>(&receipt_sql)
            .bind(request.order_id)
            .bind(request.user_id)
            .bind(request.file_url)
            .bind(request.storage_id)
            .bind(ReceiptStatus::Submitted)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        let order = Self::set_order_status(
            &mut tx,
            request.order_id,
            &[CourseOrderStatus::Pending, CourseOrderStatus::Rejected],
            CourseOrderStatus::Paid,
            now,
        )
        .await?;

        tx.commit().await?;
        Ok((order, receipt))
    }

    /// Find receipt by ID
    pub async fn find_receipt(&self, id: i64) -> Result<Option<PaymentReceipt>, BakeshopError> {
        let sql = format!("SELECT {RECEIPT_COLUMNS} FROM payment_receipts WHERE id = $1");
        let receipt = sqlx::query_as::<_, PaymentReceipt>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(receipt)
    }

    /// Receipts attached to an order, newest first
    pub async fn list_receipts(&self, order_id: i64) -> Result<Vec<PaymentReceipt>, BakeshopError> {
        let sql = format!("SELECT {RECEIPT_COLUMNS} FROM payment_receipts WHERE order_id = $1 ORDER BY uploaded_at DESC");
        let receipts = sqlx::query_as::<_, PaymentReceipt>(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(receipts)
    }

    /// Verify a receipt: receipt verified, order verified, access granted.
    ///
    /// All three writes commit together.
    pub async fn verify_receipt(&self, receipt_id: i64, admin_note: Option<String>) -> Result<(CourseOrder, PaymentReceipt, CourseAccess), BakeshopError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let receipt = Self::review_receipt(&mut tx, receipt_id, ReceiptStatus::Verified, admin_note, now).await?;
        let order = Self::set_order_status(&mut tx, receipt.order_id, &[CourseOrderStatus::Paid], CourseOrderStatus::Verified, now).await?;

        let access = sqlx::query_as::<_, CourseAccess>(
            r#"
            INSERT INTO course_access (user_id, course_id, order_id, granted_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, course_id) DO UPDATE SET order_id = EXCLUDED.order_id
            RETURNING id, user_id, course_id, order_id, granted_at
            "#
        )
        .bind(order.user_id)
        .bind(order.course_id)
        .bind(order.id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((order, receipt, access))
    }

    /// Reject a receipt and move its order to `rejected`
    pub async fn reject_receipt(&self, receipt_id: i64, admin_note: Option<String>) -> Result<(CourseOrder, PaymentReceipt), BakeshopError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let receipt = Self::review_receipt(&mut tx, receipt_id, ReceiptStatus::Rejected, admin_note, now).await?;
        let order = Self::set_order_status(&mut tx, receipt.order_id, &[CourseOrderStatus::Paid], CourseOrderStatus::Rejected, now).await?;

        tx.commit().await?;
        Ok((order, receipt))
    }

    /// Compare-and-set a `submitted` receipt to its reviewed status
    async fn review_receipt(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        receipt_id: i64,
        status: ReceiptStatus,
        admin_note: Option<String>,
        now: chrono::DateTime<Utc>,
    ) -> Result<PaymentReceipt, BakeshopError> {
        let sql = format!(
            r#"
            UPDATE payment_receipts
            SET status = $2, admin_note = COALESCE($3, admin_note), reviewed_at = $4
            WHERE id = $1 AND status = 'submitted'
            RETURNING {RECEIPT_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, PaymentReceipt>(&sql)
            .bind(receipt_id)
            .bind(status)
            .bind(admin_note)
            .bind(now)
            .fetch_optional(&mut **tx)
            .await?;
        if let Some(receipt) = updated {
            return Ok(receipt);
        }

        let current: Option<(ReceiptStatus,)> = sqlx::query_as("SELECT status FROM payment_receipts WHERE id = $1")
            .bind(receipt_id)
            .fetch_optional(&mut **tx)
            .await?;
        match current {
            Some((current,)) => Err(BakeshopError::InvalidStateTransition {
                from: format!("receipt {}", current),
                to: status.to_string(),
            }),
            None => Err(BakeshopError::not_found("Receipt", receipt_id)),
        }
    }

    /// Compare-and-set an order from one of `expected` to `status`
    async fn set_order_status(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        order_id: i64,
        expected: &[CourseOrderStatus],
        status: CourseOrderStatus,
        now: chrono::DateTime<Utc>,
    ) -> Result<CourseOrder, BakeshopError> {
        let sql = format!(
            "UPDATE course_orders SET status = $2, updated_at = $3 WHERE id = $1 AND status::TEXT = ANY($4) RETURNING {ORDER_COLUMNS}"
        );
        let expected: Vec<String> = expected.iter().map(|s| s.as_str().to_string()).collect();

        let updated = sqlx::query_as::<_, CourseOrder>(&sql)
            .bind(order_id)
            .bind(status)
            .bind(now)
            .bind(expected)
            .fetch_optional(&mut **tx)
            .await?;
        if let Some(order) = updated {
            return Ok(order);
        }

        let current: Option<(CourseOrderStatus,)> = sqlx::query_as("SELECT status FROM course_orders WHERE id = $1")
            .bind(order_id)
            .fetch_optional(&mut **tx)
            .await?;
        match current {
            Some((current,)) => Err(BakeshopError::InvalidStateTransition {
                from: current.to_string(),
                to: status.to_string(),
            }),
            None => Err(BakeshopError::not_found("Course order", order_id)),
        }
    }

    // Access methods
    /// Whether the user has been granted the course
    pub async fn has_access(&self, user_id: i64, course_id: i64) -> Result<bool, BakeshopError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM course_access WHERE user_id = $1 AND course_id = $2)"
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Courses the user has access to
    pub async fn list_user_courses(&self, user_id: i64) -> Result<Vec<Course>, BakeshopError> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT c.id, c.title, c.description, c.price_cents, c.image_url, c.level, c.lessons, c.is_published, c.created_at, c.updated_at
            FROM courses c
            INNER JOIN course_access ca ON c.id = ca.course_id
            WHERE ca.user_id = $1
            ORDER BY ca.granted_at DESC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }
}
