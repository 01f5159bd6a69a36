//! Admin repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::admin::{AdminSetting, Stats, StatusCounts};
use crate::models::user::Admin;
use crate::utils::errors::BakeshopError;

#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Membership methods
    /// Read-only capability check
    pub async fn is_admin(&self, user_id: i64) -> Result<bool, BakeshopError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM admins WHERE user_id = $1)"
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Grant admin membership; granting twice is a no-op
    pub async fn grant(&self, user_id: i64) -> Result<Admin, BakeshopError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (user_id, granted_at)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING user_id, granted_at
            "#
        )
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }

    /// Grant admin membership to every existing user with one of these emails
    pub async fn grant_by_emails(&self, emails: &[String]) -> Result<u64, BakeshopError> {
        if emails.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO admins (user_id, granted_at)
            SELECT id, NOW() FROM users WHERE email = ANY($1)
            ON CONFLICT (user_id) DO NOTHING
            "#
        )
        .bind(emails)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    // Admin Settings methods
    /// Create or replace an admin setting
    pub async fn upsert_setting(&self, key: &str, value: serde_json::Value, updated_by: Option<i64>) -> Result<AdminSetting, BakeshopError> {
        let setting = sqlx::query_as::<_, AdminSetting>(
            r#"
            INSERT INTO admin_settings (key, value, updated_by, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (key)
            DO UPDATE SET
                value = EXCLUDED.value,
                updated_by = EXCLUDED.updated_by,
                updated_at = EXCLUDED.updated_at
            RETURNING id, key, value, updated_by, updated_at
            "#
        )
        .bind(key)
        .bind(value)
        .bind(updated_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(setting)
    }

    /// Get admin setting by key
    pub async fn get_setting(&self, key: &str) -> Result<Option<AdminSetting>, BakeshopError> {
        let setting = sqlx::query_as::<_, AdminSetting>(
            "SELECT id, key, value, updated_by, updated_at FROM admin_settings WHERE key = $1"
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(setting)
    }

    /// Delete admin setting
    pub async fn delete_setting(&self, key: &str) -> Result<bool, BakeshopError> {
        let result = sqlx::query("DELETE FROM admin_settings WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List all admin settings
    pub async fn list_settings(&self) -> Result<Vec<AdminSetting>, BakeshopError> {
        let settings = sqlx::query_as::<_, AdminSetting>(
            "SELECT id, key, value, updated_by, updated_at FROM admin_settings ORDER BY key ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn status_counts(&self, sql: &str) -> Result<StatusCounts, BakeshopError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(StatusCounts::from_rows(rows))
    }

    async fn scalar_count(&self, sql: &str) -> Result<i64, BakeshopError> {
        let count: (i64,) = sqlx::query_as(sql)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Get statistics
    pub async fn get_stats(&self) -> Result<Stats, BakeshopError> {
        Ok(Stats {
            cake_orders: self
                .status_counts("SELECT status::text, COUNT(*) FROM cake_orders GROUP BY status")
                .await?,
            course_orders: self
                .status_counts("SELECT status::text, COUNT(*) FROM course_orders GROUP BY status")
                .await?,
            reservations: self
                .status_counts("SELECT status::text, COUNT(*) FROM workshop_reservations GROUP BY status")
                .await?,
            unread_messages: self
                .scalar_count("SELECT COUNT(*) FROM contact_messages WHERE is_read = false")
                .await?,
            gallery_items: self.scalar_count("SELECT COUNT(*) FROM gallery_items").await?,
            active_workshops: self
                .scalar_count("SELECT COUNT(*) FROM workshops WHERE is_active = true")
                .await?,
            published_courses: self
                .scalar_count("SELECT COUNT(*) FROM courses WHERE is_published = true")
                .await?,
            users: self.scalar_count("SELECT COUNT(*) FROM users").await?,
        })
    }
}
