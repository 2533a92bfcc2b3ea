//! Seed tool: loads a starter catalog, a week of hourly time slots, and a
//! default admin account into an empty database.
//!
//! Safe to re-run: existing rows are matched by name/email and skipped.
//!
//! ```sh
//! DATABASE_URL=postgres://... cargo run --bin seed
//! ```

use chrono::{Duration, Timelike, Utc};
use sqlx::PgPool;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const SERVICES: &[(&str, &str, i32)] = &[
    ("Haircut", "Classic cut and style", 30),
    ("Hair Color", "Full color treatment", 120),
    ("Beard Trim", "Shape and trim", 15),
    ("Consultation", "Style consultation", 20),
];

const ADMIN_EMAIL: &str = "admin@waitline.local";

/// Hourly slots from 09:00 to 17:00 (last start 16:00)
const OPEN_HOUR: u32 = 9;
const CLOSE_HOUR: u32 = 17;
const SEED_DAYS: i64 = 7;
const SLOT_CAPACITY: i32 = 3;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info".into()),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;
    let pool = PgPool::connect(&database_url).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let service_ids = seed_services(&pool).await?;
    let slots = seed_time_slots(&pool, &service_ids).await?;
    seed_admin(&pool).await?;

    tracing::info!(
        services = service_ids.len(),
        slots,
        "Seed complete"
    );
    Ok(())
}

async fn seed_services(pool: &PgPool) -> Result<Vec<Uuid>, BoxError> {
    let mut ids = Vec::with_capacity(SERVICES.len());

    for &(name, description, duration_minutes) in SERVICES {
        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM services WHERE name = $1")
                .bind(name)
                .fetch_optional(pool)
                .await?;

        let id = match existing {
            Some((id,)) => id,
            None => {
                let (id,): (Uuid,) = sqlx::query_as(
                    "INSERT INTO services (id, name, description, duration_minutes, is_active)
                     VALUES ($1, $2, $3, $4, TRUE)
                     RETURNING id",
                )
                .bind(Uuid::new_v4())
                .bind(name)
                .bind(description)
                .bind(duration_minutes)
                .fetch_one(pool)
                .await?;
                tracing::info!(name, "Created service");
                id
            }
        };
        ids.push(id);
    }

    Ok(ids)
}

/// Hourly slots for the next `SEED_DAYS` days; hours already in the past are
/// skipped
async fn seed_time_slots(pool: &PgPool, service_ids: &[Uuid]) -> Result<u32, BoxError> {
    let now = Utc::now();
    let today = now
        .with_hour(0)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);

    let mut created = 0u32;

    for day in 0..SEED_DAYS {
        for hour in OPEN_HOUR..CLOSE_HOUR {
            let start = today + Duration::days(day) + Duration::hours(hour as i64);
            if start <= now {
                continue;
            }
            let end = start + Duration::hours(1);

            for &service_id in service_ids {
                let existing: Option<(Uuid,)> = sqlx::query_as(
                    "SELECT id FROM time_slots WHERE service_id = $1 AND start_time = $2",
                )
                .bind(service_id)
                .bind(start)
                .fetch_optional(pool)
                .await?;

                if existing.is_some() {
                    continue;
                }

                sqlx::query(
                    "INSERT INTO time_slots (id, service_id, start_time, end_time, capacity, is_available)
                     VALUES ($1, $2, $3, $4, $5, TRUE)",
                )
                .bind(Uuid::new_v4())
                .bind(service_id)
                .bind(start)
                .bind(end)
                .bind(SLOT_CAPACITY)
                .execute(pool)
                .await?;
                created += 1;
            }
        }
    }

    Ok(created)
}

async fn seed_admin(pool: &PgPool) -> Result<(), BoxError> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(ADMIN_EMAIL)
        .fetch_optional(pool)
        .await?;

    if existing.is_some() {
        return Ok(());
    }

    let password =
        std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "changeme-admin".into());
    let hashed = hash_password(&password)?;

    sqlx::query(
        "INSERT INTO users (id, name, email, hashed_password, role)
         VALUES ($1, 'Admin', $2, $3, 'admin')",
    )
    .bind(Uuid::new_v4())
    .bind(ADMIN_EMAIL)
    .bind(&hashed)
    .execute(pool)
    .await?;

    tracing::info!(email = ADMIN_EMAIL, "Created admin account");
    Ok(())
}

fn hash_password(password: &str) -> Result<String, BoxError> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| format!("password hash failed: {e}"))?;
    Ok(hash.to_string())
}
