//! Shared fixtures for database tests

use chrono::{Duration, Utc};
use shared::error::ErrorCode;
use shared::models::{Reservation, Service, TimeSlot, User, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ServiceError;

pub async fn user(pool: &PgPool, email: &str) -> User {
    super::users::create(pool, "Test User", email, "unverifiable-hash", UserRole::Customer)
        .await
        .unwrap()
}

pub async fn service(pool: &PgPool, duration_minutes: i32) -> Service {
    super::services::create(pool, "Haircut", None, duration_minutes)
        .await
        .unwrap()
}

pub async fn slot(pool: &PgPool, service_id: Uuid, capacity: i32) -> TimeSlot {
    let start = Utc::now() + Duration::hours(1);
    super::time_slots::create(pool, service_id, start, start + Duration::hours(1), capacity)
        .await
        .unwrap()
}

/// Confirmed reservation on a fresh service + capacity-1 slot
pub async fn confirmed_reservation(pool: &PgPool, user_id: Uuid) -> Reservation {
    let service = service(pool, 30).await;
    let slot = slot(pool, service.id, 1).await;
    super::reservations::create(pool, user_id, service.id, slot.id, None)
        .await
        .unwrap()
}

/// Waiting positions, ascending
pub async fn waiting_positions(pool: &PgPool) -> Vec<i32> {
    let rows: Vec<(i32,)> = sqlx::query_as(
        "SELECT position FROM queue_entries WHERE status = 'waiting' ORDER BY position",
    )
    .fetch_all(pool)
    .await
    .unwrap();
    rows.into_iter().map(|(p,)| p).collect()
}

/// Business-rule error code carried by a ServiceError, if any
pub fn app_code(err: ServiceError) -> Option<ErrorCode> {
    match err {
        ServiceError::App(e) => Some(e.code),
        ServiceError::Db(_) => None,
    }
}
