//! Queue entry model
//!
//! A queue entry is a checked-in reservation's place in the live waiting
//! line. Entries with status `waiting` hold a dense 1..N `position` sequence
//! in arrival order; terminal entries keep their last position for history
//! but are excluded from the waiting set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::service::ServiceSummary;
use super::time_slot::TimeSlotSummary;
use super::user::UserSummary;

/// A checked-in reservation's position in the waiting line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct QueueEntry {
    pub id: Uuid,
    /// At most one entry per reservation (unique constraint)
    pub reservation_id: Uuid,
    /// 1-based position among waiting entries
    pub position: i32,
    /// One of [`QueueStatus`], stored as text
    pub status: String,
    pub check_in_time: chrono::DateTime<chrono::Utc>,
    pub estimated_start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub actual_start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_time: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl QueueEntry {
    pub fn status(&self) -> Result<QueueStatus, String> {
        self.status.parse()
    }
}

/// Queue entry lifecycle
///
/// ```text
///         check-in
///  (none) --------> waiting --advance--> in_progress --complete--> completed
///                      |
///                      +--cancel--> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Waiting,
    InProgress,
    Completed,
    Cancelled,
}

impl QueueStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// `waiting` and `in_progress` are the only non-terminal states
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether a transition from `self` to `next` is permitted
    pub const fn can_transition_to(&self, next: QueueStatus) -> bool {
        matches!(
            (self, next),
            (Self::Waiting, Self::InProgress)
                | (Self::Waiting, Self::Cancelled)
                | (Self::InProgress, Self::Completed)
        )
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown queue status: {other}")),
        }
    }
}

/// Reservation summary nested in the queue view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationSummary {
    pub id: Uuid,
    pub status: String,
    pub notes: Option<String>,
}

/// Queue entry joined with reservation, user, service, and slot
/// (the admin queue view, polled by the surface)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntryDetail {
    pub id: Uuid,
    pub position: i32,
    pub status: String,
    pub check_in_time: chrono::DateTime<chrono::Utc>,
    pub estimated_start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub actual_start_time: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_time: Option<chrono::DateTime<chrono::Utc>>,
    pub reservation: ReservationSummary,
    pub user: UserSummary,
    pub service: ServiceSummary,
    pub time_slot: TimeSlotSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            QueueStatus::Waiting,
            QueueStatus::InProgress,
            QueueStatus::Completed,
            QueueStatus::Cancelled,
        ] {
            let parsed: QueueStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_state_machine() {
        assert!(QueueStatus::Waiting.can_transition_to(QueueStatus::InProgress));
        assert!(QueueStatus::Waiting.can_transition_to(QueueStatus::Cancelled));
        assert!(QueueStatus::InProgress.can_transition_to(QueueStatus::Completed));

        // waiting never jumps straight to completed
        assert!(!QueueStatus::Waiting.can_transition_to(QueueStatus::Completed));
        // in_progress cannot be cancelled or re-queued
        assert!(!QueueStatus::InProgress.can_transition_to(QueueStatus::Cancelled));
        assert!(!QueueStatus::InProgress.can_transition_to(QueueStatus::Waiting));
    }

    #[test]
    fn test_terminal_states() {
        assert!(QueueStatus::Completed.is_terminal());
        assert!(QueueStatus::Cancelled.is_terminal());
        assert!(!QueueStatus::Waiting.is_terminal());
        assert!(!QueueStatus::InProgress.is_terminal());

        for next in [
            QueueStatus::Waiting,
            QueueStatus::InProgress,
            QueueStatus::Completed,
            QueueStatus::Cancelled,
        ] {
            assert!(!QueueStatus::Completed.can_transition_to(next));
            assert!(!QueueStatus::Cancelled.can_transition_to(next));
        }
    }
}
