use chrono::{DateTime, Utc};
use shared::models::{TimeSlot, TimeSlotAvailability};
use sqlx::PgPool;
use uuid::Uuid;

/// Available slots for a service starting on/after `from`, ascending by
/// start time, each annotated with remaining capacity
pub async fn list_available(
    pool: &PgPool,
    service_id: Uuid,
    from: DateTime<Utc>,
) -> Result<Vec<TimeSlotAvailability>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT ts.id, ts.service_id, ts.start_time, ts.end_time,
               ts.capacity, ts.is_available,
               s.name AS service_name,
               s.duration_minutes AS service_duration_minutes,
               ts.capacity - COUNT(r.id) FILTER (WHERE r.status <> 'cancelled')
                   AS available_spots
        FROM time_slots ts
        JOIN services s ON s.id = ts.service_id
        LEFT JOIN reservations r ON r.time_slot_id = ts.id
        WHERE ts.service_id = $1
          AND ts.is_available = TRUE
          AND ts.start_time >= $2
        GROUP BY ts.id, s.name, s.duration_minutes
        ORDER BY ts.start_time
        "#,
    )
    .bind(service_id)
    .bind(from)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<TimeSlot>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM time_slots WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    service_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    capacity: i32,
) -> Result<TimeSlot, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO time_slots (id, service_id, start_time, end_time, capacity, is_available)
         VALUES ($1, $2, $3, $4, $5, TRUE)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(service_id)
    .bind(start_time)
    .bind(end_time)
    .bind(capacity)
    .fetch_one(pool)
    .await
}
