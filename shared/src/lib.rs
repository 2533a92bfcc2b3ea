//! Shared types for the Waitline booking system
//!
//! Common types used by the server and tooling: error codes and the
//! `AppError` response type, plus the domain models (services, time slots,
//! reservations, queue entries).

pub mod error;
pub mod models;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
