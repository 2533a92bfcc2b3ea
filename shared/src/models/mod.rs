//! Domain models for the Waitline booking system

pub mod queue_entry;
pub mod reservation;
pub mod service;
pub mod time_slot;
pub mod user;

pub use queue_entry::{QueueEntry, QueueEntryDetail, QueueStatus, ReservationSummary};
pub use reservation::{Reservation, ReservationDetail, ReservationStatus};
pub use service::{Service, ServiceSummary};
pub use time_slot::{TimeSlot, TimeSlotAvailability, TimeSlotSummary};
pub use user::{User, UserRole, UserSummary};
