//! Reservation endpoints
//!
//! All routes here operate on the caller's own reservations; ownership is
//! enforced in the db layer so a foreign id looks like a missing one.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::reservation::{Reservation, ReservationDetail, ReservationStatus};
use uuid::Uuid;

use crate::auth::UserIdentity;
use crate::db;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/reservations
pub async fn list_reservations(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Vec<ReservationDetail>> {
    let reservations = db::reservations::list_for_user(&state.pool, identity.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Reservations query error: {e}");
            AppError::new(ErrorCode::DatabaseError)
        })?;

    Ok(Json(reservations))
}

#[derive(Deserialize)]
pub struct CreateReservationRequest {
    pub service_id: Uuid,
    pub time_slot_id: Uuid,
    pub notes: Option<String>,
}

/// POST /api/reservations
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(req): Json<CreateReservationRequest>,
) -> ApiResult<Reservation> {
    let reservation = db::reservations::create(
        &state.pool,
        identity.user_id,
        req.service_id,
        req.time_slot_id,
        req.notes.as_deref(),
    )
    .await?;

    tracing::info!(
        reservation_id = %reservation.id,
        user_id = %identity.user_id,
        "Reservation created"
    );

    Ok(Json(reservation))
}

/// GET /api/reservations/:id
pub async fn get_reservation(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> ApiResult<Reservation> {
    let reservation = db::reservations::find_owned(&state.pool, id, identity.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Reservation lookup error: {e}");
            AppError::new(ErrorCode::DatabaseError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;

    Ok(Json(reservation))
}

#[derive(Deserialize)]
pub struct UpdateReservationRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// PATCH /api/reservations/:id
///
/// Partial update: omitted fields keep their current value. In particular
/// `notes` is merged COALESCE-style, so existing notes cannot be cleared,
/// only replaced.
pub async fn update_reservation(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateReservationRequest>,
) -> ApiResult<Reservation> {
    let status = match &req.status {
        Some(raw) => raw
            .parse::<ReservationStatus>()
            .map_err(|_| AppError::validation("Unknown reservation status"))?,
        // Status untouched; resolve to the current one so the transition
        // check is a no-op
        None => {
            let current = db::reservations::find_owned(&state.pool, id, identity.user_id)
                .await
                .map_err(|e| {
                    tracing::error!("Reservation lookup error: {e}");
                    AppError::new(ErrorCode::DatabaseError)
                })?
                .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;
            current
                .status()
                .map_err(|e| AppError::internal(format!("Corrupt reservation status: {e}")))?
        }
    };

    let updated = db::reservations::update_owned(
        &state.pool,
        id,
        identity.user_id,
        status,
        req.notes.as_deref(),
    )
    .await?;

    Ok(Json(updated))
}

/// DELETE /api/reservations/:id
///
/// Cancels rather than deletes; the row stays for history and capacity math
/// excludes it.
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> ApiResult<Reservation> {
    let cancelled = db::reservations::cancel_owned(&state.pool, id, identity.user_id).await?;

    tracing::info!(reservation_id = %id, "Reservation cancelled");

    Ok(Json(cancelled))
}
