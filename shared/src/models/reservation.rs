//! Reservation model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::service::ServiceSummary;
use super::time_slot::TimeSlotSummary;

/// A user's claim on a time slot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub time_slot_id: Uuid,
    /// One of [`ReservationStatus`], stored as text
    pub status: String,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Reservation {
    pub fn status(&self) -> Result<ReservationStatus, String> {
        self.status.parse()
    }
}

/// Reservation status lifecycle
///
/// confirmed → cancelled (user cancel) or confirmed → completed (via queue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Whether a transition from `self` to `next` is permitted
    pub const fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (Self::Confirmed, Self::Cancelled) | (Self::Confirmed, Self::Completed)
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown reservation status: {other}")),
        }
    }
}

/// Reservation joined with its service and slot (list endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationDetail {
    pub id: Uuid,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub service: ServiceSummary,
    pub time_slot: TimeSlotSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
            ReservationStatus::Completed,
        ] {
            let parsed: ReservationStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_transitions_from_confirmed() {
        assert!(ReservationStatus::Confirmed.can_transition_to(ReservationStatus::Cancelled));
        assert!(ReservationStatus::Confirmed.can_transition_to(ReservationStatus::Completed));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ReservationStatus::Cancelled.can_transition_to(ReservationStatus::Confirmed));
        assert!(!ReservationStatus::Cancelled.can_transition_to(ReservationStatus::Completed));
        assert!(!ReservationStatus::Completed.can_transition_to(ReservationStatus::Cancelled));
    }
}
