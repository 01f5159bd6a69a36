//! Contact message repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::message::{ContactMessage, CreateContactMessageRequest};
use crate::utils::errors::BakeshopError;

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a contact form submission
    pub async fn create(&self, request: CreateContactMessageRequest) -> Result<ContactMessage, BakeshopError> {
        let message = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, phone, subject, message, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, false, $6)
            RETURNING id, name, email, phone, subject, message, is_read, created_at
            "#
        )
        .bind(request.name)
        .bind(request.email)
        .bind(request.phone)
        .bind(request.subject)
        .bind(request.message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    /// List messages, unread first
    pub async fn list(&self) -> Result<Vec<ContactMessage>, BakeshopError> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            "SELECT id, name, email, phone, subject, message, is_read, created_at FROM contact_messages ORDER BY is_read ASC, created_at DESC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Mark a message as read
    pub async fn mark_read(&self, id: i64) -> Result<Option<ContactMessage>, BakeshopError> {
        let message = sqlx::query_as::<_, ContactMessage>(
            r#"
            UPDATE contact_messages SET is_read = true WHERE id = $1
            RETURNING id, name, email, phone, subject, message, is_read, created_at
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    /// Delete message
    pub async fn delete(&self, id: i64) -> Result<bool, BakeshopError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
