use shared::models::Service;
use sqlx::PgPool;
use uuid::Uuid;

/// Active services, ascending by name (public catalog listing)
pub async fn list_active(pool: &PgPool) -> Result<Vec<Service>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM services WHERE is_active = TRUE ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Service>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM services WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
    duration_minutes: i32,
) -> Result<Service, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO services (id, name, description, duration_minutes, is_active)
         VALUES ($1, $2, $3, $4, TRUE)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .bind(duration_minutes)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
    duration_minutes: Option<i32>,
    is_active: Option<bool>,
) -> Result<Option<Service>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE services SET
             name = COALESCE($2, name),
             description = COALESCE($3, description),
             duration_minutes = COALESCE($4, duration_minutes),
             is_active = COALESCE($5, is_active),
             updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(duration_minutes)
    .bind(is_active)
    .fetch_optional(pool)
    .await
}

/// Soft-disable: services referenced by slots or reservations are never
/// hard-deleted
pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<Option<Service>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE services SET is_active = FALSE, updated_at = now()
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
