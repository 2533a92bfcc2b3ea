//! Time slot endpoints

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{TimeSlot, TimeSlotAvailability};
use uuid::Uuid;

use crate::db;
use crate::state::AppState;

use super::ApiResult;

#[derive(Deserialize)]
pub struct SlotQuery {
    /// Earliest date to include, YYYY-MM-DD; defaults to today
    pub from: Option<String>,
}

/// GET /api/timeslots/:service_id
pub async fn list_time_slots(
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
    Query(query): Query<SlotQuery>,
) -> ApiResult<Vec<TimeSlotAvailability>> {
    let service = db::services::find_by_id(&state.pool, service_id)
        .await
        .map_err(|e| {
            tracing::error!("Service lookup error: {e}");
            AppError::new(ErrorCode::DatabaseError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::ServiceNotFound))?;

    if !service.is_active {
        return Err(AppError::new(ErrorCode::ServiceInactive));
    }

    let from = match &query.from {
        Some(raw) => {
            let date = raw.parse::<NaiveDate>().map_err(|_| {
                AppError::validation("Invalid date, expected YYYY-MM-DD")
            })?;
            DateTime::<Utc>::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc)
        }
        None => Utc::now(),
    };

    let slots = db::time_slots::list_available(&state.pool, service_id, from)
        .await
        .map_err(|e| {
            tracing::error!("Time slots query error: {e}");
            AppError::new(ErrorCode::DatabaseError)
        })?;

    Ok(Json(slots))
}

#[derive(Deserialize)]
pub struct CreateTimeSlotRequest {
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: i32,
}

/// POST /api/admin/timeslots
pub async fn create_time_slot(
    State(state): State<AppState>,
    Json(req): Json<CreateTimeSlotRequest>,
) -> ApiResult<TimeSlot> {
    if req.end_time <= req.start_time {
        return Err(AppError::validation("End time must be after start time"));
    }
    if req.capacity < 1 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Capacity must be at least 1",
        ));
    }

    let service = db::services::find_by_id(&state.pool, req.service_id)
        .await
        .map_err(|e| {
            tracing::error!("Service lookup error: {e}");
            AppError::new(ErrorCode::DatabaseError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::ServiceNotFound))?;

    if !service.is_active {
        return Err(AppError::new(ErrorCode::ServiceInactive));
    }

    let slot = db::time_slots::create(
        &state.pool,
        req.service_id,
        req.start_time,
        req.end_time,
        req.capacity,
    )
    .await
    .map_err(|e| {
        tracing::error!("Create time slot error: {e}");
        AppError::new(ErrorCode::DatabaseError)
    })?;

    Ok(Json(slot))
}
