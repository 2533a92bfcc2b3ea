//! Unified error codes for the Waitline booking system
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Catalog errors (services, time slots)
//! - 4xxx: Reservation errors
//! - 5xxx: Queue errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Email already registered
    EmailTaken = 1005,
    /// Password too short
    PasswordTooShort = 1006,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2002,

    // ==================== 3xxx: Catalog ====================
    /// Service not found
    ServiceNotFound = 3001,
    /// Service is disabled
    ServiceInactive = 3002,
    /// Time slot not found
    TimeSlotNotFound = 3101,
    /// Time slot is not available
    TimeSlotUnavailable = 3102,
    /// Time slot has no remaining capacity
    TimeSlotFull = 3103,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Reservation is not in a state that permits the transition
    ReservationNotEligible = 4002,
    /// Reservation already cancelled
    ReservationAlreadyCancelled = 4003,

    // ==================== 5xxx: Queue ====================
    /// Queue entry not found
    QueueEntryNotFound = 5001,
    /// Reservation already checked in
    AlreadyCheckedIn = 5002,
    /// Queue entry not eligible to advance
    QueueEntryNotAdvanceable = 5003,
    /// Queue entry not eligible to complete
    QueueEntryNotCompletable = 5004,
    /// Queue entry not eligible to cancel
    QueueEntryNotCancellable = 5005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::EmailTaken => "Email is already registered",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Catalog
            ErrorCode::ServiceNotFound => "Service not found",
            ErrorCode::ServiceInactive => "Service is disabled",
            ErrorCode::TimeSlotNotFound => "Time slot not found",
            ErrorCode::TimeSlotUnavailable => "Time slot is not available",
            ErrorCode::TimeSlotFull => "Time slot is already booked",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::ReservationNotEligible => {
                "Reservation not found or not eligible for check-in"
            }
            ErrorCode::ReservationAlreadyCancelled => "Reservation is already cancelled",

            // Queue
            ErrorCode::QueueEntryNotFound => "Queue entry not found",
            ErrorCode::AlreadyCheckedIn => "Already checked in",
            ErrorCode::QueueEntryNotAdvanceable => {
                "Queue entry not found or not eligible to advance"
            }
            ErrorCode::QueueEntryNotCompletable => {
                "Queue entry not found or not eligible to complete"
            }
            ErrorCode::QueueEntryNotCancellable => {
                "Queue entry not found or not eligible to cancel"
            }

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::EmailTaken),
            1006 => Ok(ErrorCode::PasswordTooShort),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::AdminRequired),

            // Catalog
            3001 => Ok(ErrorCode::ServiceNotFound),
            3002 => Ok(ErrorCode::ServiceInactive),
            3101 => Ok(ErrorCode::TimeSlotNotFound),
            3102 => Ok(ErrorCode::TimeSlotUnavailable),
            3103 => Ok(ErrorCode::TimeSlotFull),

            // Reservation
            4001 => Ok(ErrorCode::ReservationNotFound),
            4002 => Ok(ErrorCode::ReservationNotEligible),
            4003 => Ok(ErrorCode::ReservationAlreadyCancelled),

            // Queue
            5001 => Ok(ErrorCode::QueueEntryNotFound),
            5002 => Ok(ErrorCode::AlreadyCheckedIn),
            5003 => Ok(ErrorCode::QueueEntryNotAdvanceable),
            5004 => Ok(ErrorCode::QueueEntryNotCompletable),
            5005 => Ok(ErrorCode::QueueEntryNotCancellable),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
