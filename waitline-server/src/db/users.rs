use shared::models::{User, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password;

pub async fn create(
    pool: &PgPool,
    name: &str,
    email: &str,
    hashed_password: &str,
    role: UserRole,
) -> Result<User, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO users (id, name, email, hashed_password, role)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(hashed_password)
    .bind(role.as_str())
    .fetch_one(pool)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Look up a user by email and verify the password
pub async fn authenticate(
    pool: &PgPool,
    email: &str,
    password_attempt: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    let Some(user) = user else {
        return Ok(None);
    };

    if password::verify_password(password_attempt, &user.hashed_password) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}
