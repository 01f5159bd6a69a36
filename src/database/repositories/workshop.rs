//! Workshop and reservation repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::workshop::{
    Workshop, CreateWorkshopRequest, UpdateWorkshopRequest, WorkshopReservation,
    ReservationStatus, CreateReservationRequest,
};
use crate::utils::errors::BakeshopError;

const WORKSHOP_COLUMNS: &str = "id, title, description, workshop_date, start_time, duration_minutes, price_cents, capacity, location, image_url, is_active, created_at, updated_at";
const RESERVATION_COLUMNS: &str = "id, workshop_id, participant_name, participant_email, participant_phone, seats, notes, status, created_at";

#[derive(Clone)]
pub struct WorkshopRepository {
    pool: PgPool,
}

impl WorkshopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new workshop
    pub async fn create(&self, request: CreateWorkshopRequest) -> Result<Workshop, BakeshopError> {
        let sql = format!(
            r#"
            INSERT INTO workshops (title, description, workshop_date, start_time, duration_minutes, price_cents, capacity, location, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING {WORKSHOP_COLUMNS}
            "#
        );

        let workshop = sqlx::query_as::<_, Workshop>(&sql)
            .bind(request.title)
            .bind(request.description)
            .bind(request.workshop_date)
            .bind(request.start_time)
            .bind(request.duration_minutes)
            .bind(request.price_cents)
            .bind(request.capacity)
            .bind(request.location)
            .bind(request.image_url)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(workshop)
    }

    /// Find workshop by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Workshop>, BakeshopError> {
        let sql = format!("SELECT {WORKSHOP_COLUMNS} FROM workshops WHERE id = $1");
        let workshop = sqlx::query_as::<_, Workshop>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(workshop)
    }

    /// List workshops; `active_only` restricts to bookable ones
    pub async fn list(&self, active_only: bool) -> Result<Vec<Workshop>, BakeshopError> {
        let sql = format!(
            "SELECT {WORKSHOP_COLUMNS} FROM workshops WHERE ($1 = false OR is_active = true) ORDER BY workshop_date ASC, id ASC"
        );
        let workshops = sqlx::query_as::<_, Workshop>(&sql)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;

        Ok(workshops)
    }

    /// Update workshop
    pub async fn update(&self, id: i64, request: UpdateWorkshopRequest) -> Result<Option<Workshop>, BakeshopError> {
        let sql = format!(
            r#"
            UPDATE workshops
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                workshop_date = COALESCE($4, workshop_date),
                start_time = COALESCE($5, start_time),
                duration_minutes = COALESCE($6, duration_minutes),
                price_cents = COALESCE($7, price_cents),
                capacity = COALESCE($8, capacity),
                location = COALESCE($9, location),
                image_url = COALESCE($10, image_url),
                is_active = COALESCE($11, is_active),
                updated_at = $12
            WHERE id = $1
            RETURNING {WORKSHOP_COLUMNS}
            "#
        );

        let workshop = sqlx::query_as::<_, Workshop>(&sql)
            .bind(id)
            .bind(request.title)
            .bind(request.description)
            .bind(request.workshop_date)
            .bind(request.start_time)
            .bind(request.duration_minutes)
            .bind(request.price_cents)
            .bind(request.capacity)
            .bind(request.location)
            .bind(request.image_url)
            .bind(request.is_active)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        Ok(workshop)
    }

    /// Delete workshop (reservations cascade)
    pub async fn delete(&self, id: i64) -> Result<bool, BakeshopError> {
        let result = sqlx::query("DELETE FROM workshops WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Seats held by non-cancelled reservations
    pub async fn reserved_seats(&self, workshop_id: i64) -> Result<i64, BakeshopError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(seats), 0)::BIGINT FROM workshop_reservations WHERE workshop_id = $1 AND status <> 'cancelled'"
        )
        .bind(workshop_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Lock the workshop row and make sure `seats` more fit.
    ///
    /// Reservations already counted must not include the one being placed.
    async fn ensure_seats_available(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        workshop_id: i64,
        seats: i32,
        require_active: bool,
    ) -> Result<(), BakeshopError> {
        let workshop: Option<(i32, bool)> = sqlx::query_as(
            "SELECT capacity, is_active FROM workshops WHERE id = $1 FOR UPDATE"
        )
        .bind(workshop_id)
        .fetch_optional(&mut **tx)
        .await?;

        let capacity = match workshop {
            Some((capacity, is_active)) if is_active || !require_active => capacity,
            _ => return Err(BakeshopError::not_found("Workshop", workshop_id)),
        };

        let reserved: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(seats), 0)::BIGINT FROM workshop_reservations WHERE workshop_id = $1 AND status <> 'cancelled'"
        )
        .bind(workshop_id)
        .fetch_one(&mut **tx)
        .await?;

        let remaining = capacity as i64 - reserved.0;
        if seats as i64 > remaining {
            return Err(BakeshopError::WorkshopFull {
                requested: seats,
                remaining: remaining.max(0),
            });
        }

        Ok(())
    }

    /// Reserve seats, checking capacity while holding the workshop row lock
    pub async fn create_reservation(&self, workshop_id: i64, request: CreateReservationRequest) -> Result<WorkshopReservation, BakeshopError> {
        let mut tx = self.pool.begin().await?;

        // Inactive workshops are not bookable
        Self::ensure_seats_available(&mut tx, workshop_id, request.seats, true).await?;

        let sql = format!(
            r#"
            INSERT INTO workshop_reservations (workshop_id, participant_name, participant_email, participant_phone, seats, notes, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RESERVATION_COLUMNS}
            "#
        );
        let reservation = sqlx::query_as::<_, WorkshopReservation>(&sql)
            .bind(workshop_id)
            .bind(request.participant_name)
            .bind(request.participant_email)
            .bind(request.participant_phone)
            .bind(request.seats)
            .bind(request.notes)
            .bind(ReservationStatus::Pending)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(reservation)
    }

    /// List reservations, optionally for one workshop
    pub async fn list_reservations(&self, workshop_id: Option<i64>) -> Result<Vec<WorkshopReservation>, BakeshopError> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM workshop_reservations WHERE ($1::BIGINT IS NULL OR workshop_id = $1) ORDER BY created_at DESC"
        );
        let reservations = sqlx::query_as::<_, WorkshopReservation>(&sql)
            .bind(workshop_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(reservations)
    }

    /// Update reservation status.
    ///
    /// Moving a reservation out of `cancelled` claims its seats again, so
    /// capacity is rechecked under the workshop row lock.
    pub async fn update_reservation_status(&self, id: i64, status: ReservationStatus) -> Result<Option<WorkshopReservation>, BakeshopError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(i64, i32, ReservationStatus)> = sqlx::query_as(
            "SELECT workshop_id, seats, status FROM workshop_reservations WHERE id = $1 FOR UPDATE"
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((workshop_id, seats, previous)) = current else {
            return Ok(None);
        };

        if previous == ReservationStatus::Cancelled && status != ReservationStatus::Cancelled {
            Self::ensure_seats_available(&mut tx, workshop_id, seats, false).await?;
        }

        let sql = format!(
            "UPDATE workshop_reservations SET status = $2 WHERE id = $1 RETURNING {RESERVATION_COLUMNS}"
        );
        let reservation = sqlx::query_as::<_, WorkshopReservation>(&sql)
            .bind(id)
            .bind(status)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(reservation))
    }

    /// Delete reservation
    pub async fn delete_reservation(&self, id: i64) -> Result<bool, BakeshopError> {
        let result = sqlx::query("DELETE FROM workshop_reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
