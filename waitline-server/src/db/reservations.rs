//! Reservation ledger
//!
//! Creation enforces slot capacity inside a single transaction with the slot
//! row locked, so two concurrent bookings of the last remaining spot cannot
//! both succeed.

use chrono::{DateTime, Utc};
use shared::error::{AppError, ErrorCode};
use shared::models::reservation::{Reservation, ReservationDetail, ReservationStatus};
use shared::models::service::ServiceSummary;
use shared::models::time_slot::{TimeSlot, TimeSlotSummary};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceResult;

pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    service_id: Uuid,
    time_slot_id: Uuid,
    notes: Option<&str>,
) -> ServiceResult<Reservation> {
    let mut tx = pool.begin().await?;

    // Lock the slot row for the duration of the capacity check + insert
    let slot: Option<TimeSlot> =
        sqlx::query_as("SELECT * FROM time_slots WHERE id = $1 FOR UPDATE")
            .bind(time_slot_id)
            .fetch_optional(&mut *tx)
            .await?;

    let Some(slot) = slot else {
        return Err(AppError::new(ErrorCode::TimeSlotNotFound).into());
    };

    if slot.service_id != service_id {
        return Err(
            AppError::validation("Time slot does not belong to the requested service").into(),
        );
    }

    if !slot.is_available {
        return Err(AppError::new(ErrorCode::TimeSlotUnavailable).into());
    }

    let (booked,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM reservations
         WHERE time_slot_id = $1 AND status <> 'cancelled'",
    )
    .bind(time_slot_id)
    .fetch_one(&mut *tx)
    .await?;

    if booked >= slot.capacity as i64 {
        return Err(AppError::new(ErrorCode::TimeSlotFull).into());
    }

    let reservation: Reservation = sqlx::query_as(
        "INSERT INTO reservations (id, user_id, service_id, time_slot_id, status, notes)
         VALUES ($1, $2, $3, $4, 'confirmed', $5)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(service_id)
    .bind(time_slot_id)
    .bind(notes)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(reservation)
}

/// Flat join row for the reservation listing
#[derive(sqlx::FromRow)]
struct ReservationDetailRow {
    id: Uuid,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    service_id: Uuid,
    service_name: String,
    service_duration_minutes: i32,
    time_slot_id: Uuid,
    slot_start_time: DateTime<Utc>,
    slot_end_time: DateTime<Utc>,
}

impl From<ReservationDetailRow> for ReservationDetail {
    fn from(row: ReservationDetailRow) -> Self {
        ReservationDetail {
            id: row.id,
            status: row.status,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
            service: ServiceSummary {
                id: row.service_id,
                name: row.service_name,
                duration_minutes: row.service_duration_minutes,
            },
            time_slot: TimeSlotSummary {
                id: row.time_slot_id,
                start_time: row.slot_start_time,
                end_time: row.slot_end_time,
            },
        }
    }
}

/// Caller's own reservations, oldest first
pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ReservationDetail>, sqlx::Error> {
    let rows: Vec<ReservationDetailRow> = sqlx::query_as(
        r#"
        SELECT r.id, r.status, r.notes, r.created_at, r.updated_at,
               s.id AS service_id, s.name AS service_name,
               s.duration_minutes AS service_duration_minutes,
               ts.id AS time_slot_id,
               ts.start_time AS slot_start_time,
               ts.end_time AS slot_end_time
        FROM reservations r
        JOIN services s ON s.id = r.service_id
        JOIN time_slots ts ON ts.id = r.time_slot_id
        WHERE r.user_id = $1
        ORDER BY r.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Ownership is enforced in the WHERE clause: another user's reservation id
/// behaves exactly like a missing one
pub async fn find_owned(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<Reservation>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM reservations WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Notes are merged COALESCE-style: an omitted `notes` keeps the existing
/// text rather than clearing it
pub async fn update_owned(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    status: ReservationStatus,
    notes: Option<&str>,
) -> ServiceResult<Reservation> {
    let mut tx = pool.begin().await?;

    let current: Option<Reservation> = sqlx::query_as(
        "SELECT * FROM reservations WHERE id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(current) = current else {
        return Err(AppError::new(ErrorCode::ReservationNotFound).into());
    };

    let current_status = current
        .status()
        .map_err(|e| AppError::internal(format!("Corrupt reservation status: {e}")))?;

    // Same-status updates are a no-op on status (notes may still change)
    if current_status != status && !current_status.can_transition_to(status) {
        return Err(AppError::new(ErrorCode::ReservationNotEligible).into());
    }

    let updated: Reservation = sqlx::query_as(
        "UPDATE reservations
         SET status = $3, notes = COALESCE($4, notes), updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .bind(status.as_str())
    .bind(notes)
    .fetch_one(&mut *tx)
    .await?;

    // A cancellation also drops any waiting queue entry
    if current_status != status && status == ReservationStatus::Cancelled {
        super::queue::cancel_for_reservation(&mut tx, id).await?;
    }

    tx.commit().await?;
    Ok(updated)
}

/// Cancel is a status flip, never a delete; idempotent for already-cancelled
/// reservations. A waiting queue entry for the reservation is cancelled in
/// the same transaction so the live queue stays consistent with the ledger.
pub async fn cancel_owned(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> ServiceResult<Reservation> {
    let mut tx = pool.begin().await?;

    let current: Option<Reservation> = sqlx::query_as(
        "SELECT * FROM reservations WHERE id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(current) = current else {
        return Err(AppError::new(ErrorCode::ReservationNotFound).into());
    };

    if current.status == ReservationStatus::Cancelled.as_str() {
        return Ok(current);
    }

    if current.status != ReservationStatus::Confirmed.as_str() {
        return Err(AppError::new(ErrorCode::ReservationNotEligible).into());
    }

    let cancelled: Reservation = sqlx::query_as(
        "UPDATE reservations SET status = 'cancelled', updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    super::queue::cancel_for_reservation(&mut tx, id).await?;

    tx.commit().await?;
    Ok(cancelled)
}
