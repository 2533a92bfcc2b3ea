//! Time slot model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed bookable interval tied to one service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TimeSlot {
    pub id: Uuid,
    pub service_id: Uuid,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    /// Maximum concurrent reservations for this slot, >= 1
    pub capacity: i32,
    pub is_available: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Slot annotated with remaining capacity for the listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TimeSlotAvailability {
    pub id: Uuid,
    pub service_id: Uuid,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    pub capacity: i32,
    pub is_available: bool,
    pub service_name: String,
    pub service_duration_minutes: i32,
    /// capacity minus the count of non-cancelled reservations
    pub available_spots: i64,
}

/// Slot summary (reservation and queue view joins)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlotSummary {
    pub id: Uuid,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
}
