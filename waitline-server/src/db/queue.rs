//! Queue ordering engine
//!
//! Maintains the single global waiting line of checked-in reservations.
//! Waiting entries hold a dense 1-based `position` sequence in arrival
//! order; check-in appends at the tail, advance/cancel renumber everything
//! behind the departing entry.
//!
//! Every read-modify-write of the position sequence runs inside one
//! transaction holding a Postgres advisory lock, so concurrent check-ins can
//! never compute the same tail position and concurrent advances can never
//! interleave their renumbering.

use chrono::{DateTime, Duration, Utc};
use shared::error::{AppError, ErrorCode};
use shared::models::queue_entry::{QueueEntry, QueueEntryDetail, ReservationSummary};
use shared::models::reservation::{Reservation, ReservationStatus};
use shared::models::service::ServiceSummary;
use shared::models::time_slot::TimeSlotSummary;
use shared::models::user::UserSummary;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::auth::UserIdentity;
use crate::error::ServiceResult;

/// Advisory lock key for the (single, global) waiting line. All position
/// mutations serialize on this key for the lifetime of their transaction.
const QUEUE_LOCK_KEY: i64 = 0x77_61_69_74_6c_69_6e_65; // "waitline"

async fn lock_queue(tx: &mut Transaction<'_, Postgres>) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(QUEUE_LOCK_KEY)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Tail position for a new entry: one past the current maximum
fn next_position(current_max: i32) -> i32 {
    current_max + 1
}

/// Estimated service start: check-in time plus the combined duration of
/// everyone already waiting
fn estimate_start(check_in: DateTime<Utc>, minutes_ahead: i64) -> DateTime<Utc> {
    check_in + Duration::minutes(minutes_ahead)
}

/// Check in a confirmed reservation, appending it at the tail of the
/// waiting line
pub async fn check_in(
    pool: &PgPool,
    reservation_id: Uuid,
    user_id: Uuid,
) -> ServiceResult<QueueEntry> {
    let mut tx = pool.begin().await?;
    lock_queue(&mut tx).await?;

    // Reservation must exist, belong to the caller, and be confirmed
    let reservation: Option<Reservation> = sqlx::query_as(
        "SELECT * FROM reservations
         WHERE id = $1 AND user_id = $2 AND status = 'confirmed'",
    )
    .bind(reservation_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    if reservation.is_none() {
        return Err(AppError::new(ErrorCode::ReservationNotEligible).into());
    }

    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM queue_entries WHERE reservation_id = $1")
            .bind(reservation_id)
            .fetch_optional(&mut *tx)
            .await?;

    if existing.is_some() {
        return Err(AppError::new(ErrorCode::AlreadyCheckedIn).into());
    }

    // Tail of the waiting line, plus the combined service time ahead of us.
    // Both reads are stable: the advisory lock excludes concurrent writers.
    let (max_position, minutes_ahead): (i32, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(MAX(qe.position), 0)::INT4,
               COALESCE(SUM(s.duration_minutes), 0)::INT8
        FROM queue_entries qe
        JOIN reservations r ON r.id = qe.reservation_id
        JOIN services s ON s.id = r.service_id
        WHERE qe.status = 'waiting'
        "#,
    )
    .fetch_one(&mut *tx)
    .await?;

    let now = Utc::now();
    let entry: QueueEntry = sqlx::query_as(
        "INSERT INTO queue_entries
             (id, reservation_id, position, status, check_in_time, estimated_start_time)
         VALUES ($1, $2, $3, 'waiting', $4, $5)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(reservation_id)
    .bind(next_position(max_position))
    .bind(now)
    .bind(estimate_start(now, minutes_ahead))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(entry)
}

/// Advance a waiting entry into service
///
/// The entry leaves the waiting set and every waiting entry behind it moves
/// up one position, so the remaining positions are again dense from 1. This
/// renumbers the whole tail rather than only the immediate successor, which
/// keeps the sequence gapless even when an entry other than the head is
/// advanced.
pub async fn advance(pool: &PgPool, entry_id: Uuid) -> ServiceResult<QueueEntry> {
    let mut tx = pool.begin().await?;
    lock_queue(&mut tx).await?;

    let current: Option<QueueEntry> = sqlx::query_as(
        "SELECT * FROM queue_entries
         WHERE id = $1 AND status = 'waiting' AND actual_start_time IS NULL
         FOR UPDATE",
    )
    .bind(entry_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(current) = current else {
        return Err(AppError::new(ErrorCode::QueueEntryNotAdvanceable).into());
    };

    let updated: QueueEntry = sqlx::query_as(
        "UPDATE queue_entries
         SET status = 'in_progress', actual_start_time = now(), updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(entry_id)
    .fetch_one(&mut *tx)
    .await?;

    renumber_behind(&mut tx, current.position).await?;

    tx.commit().await?;
    Ok(updated)
}

/// Complete an in-progress entry and close out its reservation
///
/// Positions are untouched: the entry already left the waiting set when it
/// was advanced.
pub async fn complete(pool: &PgPool, entry_id: Uuid) -> ServiceResult<QueueEntry> {
    let mut tx = pool.begin().await?;

    let updated: Option<QueueEntry> = sqlx::query_as(
        "UPDATE queue_entries
         SET status = 'completed', completed_time = now(), updated_at = now()
         WHERE id = $1 AND status = 'in_progress'
         RETURNING *",
    )
    .bind(entry_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(updated) = updated else {
        return Err(AppError::new(ErrorCode::QueueEntryNotCompletable).into());
    };

    sqlx::query(
        "UPDATE reservations SET status = $2, updated_at = now() WHERE id = $1",
    )
    .bind(updated.reservation_id)
    .bind(ReservationStatus::Completed.as_str())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(updated)
}

/// Cancel a waiting entry
///
/// The cancelled entry leaves a true gap with no successor promoted into
/// service, so every waiting entry behind it is renumbered down by one.
/// Owners may cancel their own entry; admins may cancel any.
pub async fn cancel(
    pool: &PgPool,
    entry_id: Uuid,
    caller: &UserIdentity,
) -> ServiceResult<QueueEntry> {
    let mut tx = pool.begin().await?;
    lock_queue(&mut tx).await?;

    let row: Option<QueueEntryWithOwner> = sqlx::query_as(
        r#"
        SELECT qe.*, r.user_id AS owner_id
        FROM queue_entries qe
        JOIN reservations r ON r.id = qe.reservation_id
        WHERE qe.id = $1 AND qe.status = 'waiting'
        FOR UPDATE OF qe
        "#,
    )
    .bind(entry_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(QueueEntryWithOwner {
        entry: current,
        owner_id,
    }) = row
    else {
        return Err(AppError::new(ErrorCode::QueueEntryNotCancellable).into());
    };

    if owner_id != caller.user_id && !caller.role.is_admin() {
        return Err(AppError::permission_denied("Not your queue entry").into());
    }

    let updated: QueueEntry = sqlx::query_as(
        "UPDATE queue_entries
         SET status = 'cancelled', updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(entry_id)
    .fetch_one(&mut *tx)
    .await?;

    renumber_behind(&mut tx, current.position).await?;

    tx.commit().await?;
    Ok(updated)
}

/// Drop a reservation's waiting entry when the reservation itself is
/// cancelled, so the live queue never shows a booking that no longer
/// exists. Runs inside the caller's transaction and takes the queue lock;
/// entries already advanced past `waiting` are left alone.
pub(crate) async fn cancel_for_reservation(
    tx: &mut Transaction<'_, Postgres>,
    reservation_id: Uuid,
) -> Result<(), sqlx::Error> {
    lock_queue(tx).await?;

    let entry: Option<QueueEntry> = sqlx::query_as(
        "SELECT * FROM queue_entries
         WHERE reservation_id = $1 AND status = 'waiting'
         FOR UPDATE",
    )
    .bind(reservation_id)
    .fetch_optional(&mut **tx)
    .await?;

    let Some(entry) = entry else {
        return Ok(());
    };

    sqlx::query(
        "UPDATE queue_entries SET status = 'cancelled', updated_at = now() WHERE id = $1",
    )
    .bind(entry.id)
    .execute(&mut **tx)
    .await?;

    renumber_behind(tx, entry.position).await
}

/// Shift every waiting entry behind `vacated_position` up by one, restoring
/// density. Callers must hold the queue advisory lock.
async fn renumber_behind(
    tx: &mut Transaction<'_, Postgres>,
    vacated_position: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE queue_entries
         SET position = position - 1, updated_at = now()
         WHERE status = 'waiting' AND actual_start_time IS NULL AND position > $1",
    )
    .bind(vacated_position)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Joined row: queue entry plus its reservation owner
#[derive(sqlx::FromRow)]
struct QueueEntryWithOwner {
    #[sqlx(flatten)]
    entry: QueueEntry,
    owner_id: Uuid,
}

/// Flat join row for the queue view
#[derive(sqlx::FromRow)]
struct QueueDetailRow {
    id: Uuid,
    position: i32,
    status: String,
    check_in_time: DateTime<Utc>,
    estimated_start_time: Option<DateTime<Utc>>,
    actual_start_time: Option<DateTime<Utc>>,
    completed_time: Option<DateTime<Utc>>,
    reservation_id: Uuid,
    reservation_status: String,
    reservation_notes: Option<String>,
    user_id: Uuid,
    user_name: String,
    user_email: String,
    service_id: Uuid,
    service_name: String,
    service_duration_minutes: i32,
    time_slot_id: Uuid,
    slot_start_time: DateTime<Utc>,
    slot_end_time: DateTime<Utc>,
}

impl From<QueueDetailRow> for QueueEntryDetail {
    fn from(row: QueueDetailRow) -> Self {
        QueueEntryDetail {
            id: row.id,
            position: row.position,
            status: row.status,
            check_in_time: row.check_in_time,
            estimated_start_time: row.estimated_start_time,
            actual_start_time: row.actual_start_time,
            completed_time: row.completed_time,
            reservation: ReservationSummary {
                id: row.reservation_id,
                status: row.reservation_status,
                notes: row.reservation_notes,
            },
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
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

/// Current waiting line, ascending by position, joined with reservation,
/// user, service, and slot. Pure read; safe to poll.
pub async fn list(pool: &PgPool) -> Result<Vec<QueueEntryDetail>, sqlx::Error> {
    let rows: Vec<QueueDetailRow> = sqlx::query_as(
        r#"
        SELECT qe.id, qe.position, qe.status, qe.check_in_time,
               qe.estimated_start_time, qe.actual_start_time, qe.completed_time,
               r.id AS reservation_id, r.status AS reservation_status,
               r.notes AS reservation_notes,
               u.id AS user_id, u.name AS user_name, u.email AS user_email,
               s.id AS service_id, s.name AS service_name,
               s.duration_minutes AS service_duration_minutes,
               ts.id AS time_slot_id,
               ts.start_time AS slot_start_time,
               ts.end_time AS slot_end_time
        FROM queue_entries qe
        JOIN reservations r ON r.id = qe.reservation_id
        JOIN users u ON u.id = r.user_id
        JOIN services s ON s.id = r.service_id
        JOIN time_slots ts ON ts.id = r.time_slot_id
        WHERE qe.status = 'waiting' AND qe.actual_start_time IS NULL
        ORDER BY qe.position
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Sanity check used by tests and debug assertions: waiting positions must
/// be exactly 1..=N in order
pub fn is_dense(sorted_positions: &[i32]) -> bool {
    sorted_positions
        .iter()
        .enumerate()
        .all(|(i, &p)| p == i as i32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support;
    use shared::models::user::UserRole;

    #[test]
    fn test_next_position_appends_at_tail() {
        assert_eq!(next_position(0), 1);
        assert_eq!(next_position(1), 2);
        assert_eq!(next_position(41), 42);
    }

    #[test]
    fn test_estimate_start_empty_queue() {
        let now = Utc::now();
        assert_eq!(estimate_start(now, 0), now);
    }

    #[test]
    fn test_estimate_start_sums_durations_ahead() {
        let now = Utc::now();
        // Haircut (30) + Beard Trim (15) already waiting
        assert_eq!(estimate_start(now, 45), now + Duration::minutes(45));
    }

    #[test]
    fn test_is_dense() {
        assert!(is_dense(&[]));
        assert!(is_dense(&[1]));
        assert!(is_dense(&[1, 2, 3]));
        // gap
        assert!(!is_dense(&[1, 3]));
        // duplicate
        assert!(!is_dense(&[1, 1, 2]));
        // does not start at 1
        assert!(!is_dense(&[2, 3]));
    }

    #[test]
    fn test_renumber_restores_density_after_any_removal() {
        // Simulates the SQL in renumber_behind: advancing the entry at
        // position k decrements everything behind it, not just k + 1.
        let renumber = |positions: &[i32], vacated: i32| -> Vec<i32> {
            positions
                .iter()
                .filter(|&&p| p != vacated)
                .map(|&p| if p > vacated { p - 1 } else { p })
                .collect()
        };

        // Head leaves: B and C move up
        assert_eq!(renumber(&[1, 2, 3], 1), vec![1, 2]);
        // Middle leaves: only C moves up
        assert_eq!(renumber(&[1, 2, 3], 2), vec![1, 2]);
        // Tail leaves: nothing to shift
        assert_eq!(renumber(&[1, 2, 3], 3), vec![1, 2]);

        for vacated in 1..=5 {
            let after = renumber(&[1, 2, 3, 4, 5], vacated);
            assert!(is_dense(&after), "gap after removing {vacated}");
        }
    }

    #[sqlx::test]
    async fn test_check_in_appends_at_tail_in_db(pool: PgPool) {
        for expected in 1..=3 {
            let user = test_support::user(&pool, &format!("guest{expected}@example.com")).await;
            let reservation = test_support::confirmed_reservation(&pool, user.id).await;
            let entry = check_in(&pool, reservation.id, user.id).await.unwrap();
            assert_eq!(entry.position, expected);
            assert_eq!(entry.status, "waiting");
        }

        assert!(is_dense(&test_support::waiting_positions(&pool).await));
    }

    #[sqlx::test]
    async fn test_second_check_in_rejected(pool: PgPool) {
        let user = test_support::user(&pool, "guest@example.com").await;
        let reservation = test_support::confirmed_reservation(&pool, user.id).await;

        check_in(&pool, reservation.id, user.id).await.unwrap();
        let err = check_in(&pool, reservation.id, user.id).await.unwrap_err();
        assert_eq!(
            test_support::app_code(err),
            Some(ErrorCode::AlreadyCheckedIn)
        );

        // Still exactly one entry for the reservation
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM queue_entries WHERE reservation_id = $1")
                .bind(reservation.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[sqlx::test]
    async fn test_check_in_requires_confirmed_reservation(pool: PgPool) {
        let user = test_support::user(&pool, "guest@example.com").await;
        let reservation = test_support::confirmed_reservation(&pool, user.id).await;
        crate::db::reservations::cancel_owned(&pool, reservation.id, user.id)
            .await
            .unwrap();

        let err = check_in(&pool, reservation.id, user.id).await.unwrap_err();
        assert_eq!(
            test_support::app_code(err),
            Some(ErrorCode::ReservationNotEligible)
        );
    }

    #[sqlx::test]
    async fn test_positions_stay_dense_after_advance_and_cancel(pool: PgPool) {
        let mut checked_in = Vec::new();
        for i in 0..4 {
            let user = test_support::user(&pool, &format!("guest{i}@example.com")).await;
            let reservation = test_support::confirmed_reservation(&pool, user.id).await;
            let entry = check_in(&pool, reservation.id, user.id).await.unwrap();
            checked_in.push((entry, user));
        }
        assert_eq!(test_support::waiting_positions(&pool).await, vec![1, 2, 3, 4]);

        // Advance the entry at position 2, out of FIFO order: everyone
        // behind it moves up, not just the immediate successor
        let advanced = advance(&pool, checked_in[1].0.id).await.unwrap();
        assert_eq!(advanced.status, "in_progress");
        assert!(advanced.actual_start_time.is_some());
        assert_eq!(test_support::waiting_positions(&pool).await, vec![1, 2, 3]);

        // Head owner cancels their own entry
        let (head, owner) = &checked_in[0];
        let caller = UserIdentity {
            user_id: owner.id,
            email: owner.email.clone(),
            role: UserRole::Customer,
        };
        cancel(&pool, head.id, &caller).await.unwrap();
        assert_eq!(test_support::waiting_positions(&pool).await, vec![1, 2]);
    }

    #[sqlx::test]
    async fn test_cancel_requires_owner_or_admin(pool: PgPool) {
        let owner = test_support::user(&pool, "owner@example.com").await;
        let reservation = test_support::confirmed_reservation(&pool, owner.id).await;
        let entry = check_in(&pool, reservation.id, owner.id).await.unwrap();

        let stranger = test_support::user(&pool, "stranger@example.com").await;
        let caller = UserIdentity {
            user_id: stranger.id,
            email: stranger.email.clone(),
            role: UserRole::Customer,
        };
        let err = cancel(&pool, entry.id, &caller).await.unwrap_err();
        assert_eq!(
            test_support::app_code(err),
            Some(ErrorCode::PermissionDenied)
        );
        assert_eq!(test_support::waiting_positions(&pool).await, vec![1]);

        // An admin may cancel anyone's entry
        let staff = UserIdentity {
            user_id: stranger.id,
            email: stranger.email.clone(),
            role: UserRole::Admin,
        };
        cancel(&pool, entry.id, &staff).await.unwrap();
        assert!(test_support::waiting_positions(&pool).await.is_empty());
    }

    #[sqlx::test]
    async fn test_complete_closes_out_reservation(pool: PgPool) {
        let user = test_support::user(&pool, "guest@example.com").await;
        let reservation = test_support::confirmed_reservation(&pool, user.id).await;
        let entry = check_in(&pool, reservation.id, user.id).await.unwrap();

        // Cannot complete while still waiting
        let err = complete(&pool, entry.id).await.unwrap_err();
        assert_eq!(
            test_support::app_code(err),
            Some(ErrorCode::QueueEntryNotCompletable)
        );

        advance(&pool, entry.id).await.unwrap();
        let done = complete(&pool, entry.id).await.unwrap();
        assert_eq!(done.status, "completed");
        assert!(done.completed_time.is_some());

        let (status,): (String,) =
            sqlx::query_as("SELECT status FROM reservations WHERE id = $1")
                .bind(reservation.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, "completed");
    }
}
