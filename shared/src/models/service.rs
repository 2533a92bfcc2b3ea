//! Service model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bookable service definition
///
/// Services are soft-disabled via `is_active`, never deleted while time slots
/// or reservations reference them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Duration in minutes, always > 0
    pub duration_minutes: i32,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Service summary (reservation and queue view joins)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
}
