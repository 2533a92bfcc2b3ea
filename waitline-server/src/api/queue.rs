//! Walk-in queue endpoints
//!
//! Customers check in a confirmed reservation and watch the line; staff
//! advance the line and complete service. All position changes go through
//! the engine in [`crate::db::queue`].

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::queue_entry::{QueueEntry, QueueEntryDetail};
use uuid::Uuid;

use crate::auth::UserIdentity;
use crate::db;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/queue
pub async fn list_queue(State(state): State<AppState>) -> ApiResult<Vec<QueueEntryDetail>> {
    let entries = db::queue::list(&state.pool).await.map_err(|e| {
        tracing::error!("Queue query error: {e}");
        AppError::new(ErrorCode::DatabaseError)
    })?;

    Ok(Json(entries))
}

#[derive(Deserialize)]
pub struct CheckInRequest {
    pub reservation_id: Uuid,
}

/// POST /api/queue/checkin
pub async fn check_in(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<CheckInRequest>,
) -> ApiResult<QueueEntry> {
    let entry = db::queue::check_in(&state.pool, req.reservation_id, identity.user_id).await?;

    tracing::info!(
        entry_id = %entry.id,
        position = entry.position,
        "Checked in to queue"
    );

    Ok(Json(entry))
}

/// POST /api/admin/queue/advance/:id
pub async fn advance_queue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<QueueEntry> {
    let entry = db::queue::advance(&state.pool, id).await?;

    tracing::info!(entry_id = %id, "Queue entry advanced into service");

    Ok(Json(entry))
}

/// POST /api/admin/queue/:id/complete
pub async fn complete_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<QueueEntry> {
    let entry = db::queue::complete(&state.pool, id).await?;

    tracing::info!(entry_id = %id, "Queue entry completed");

    Ok(Json(entry))
}

/// POST /api/queue/:id/cancel
///
/// Owners drop their own entry; admins may drop anyone's.
pub async fn cancel_entry(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> ApiResult<QueueEntry> {
    let entry = db::queue::cancel(&state.pool, id, &identity).await?;

    tracing::info!(entry_id = %id, "Queue entry cancelled");

    Ok(Json(entry))
}
