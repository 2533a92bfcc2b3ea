//! Service catalog endpoints

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::Service;
use uuid::Uuid;

use crate::db;
use crate::state::AppState;

use super::ApiResult;

/// GET /api/services
pub async fn list_services(State(state): State<AppState>) -> ApiResult<Vec<Service>> {
    let services = db::services::list_active(&state.pool).await.map_err(|e| {
        tracing::error!("Services query error: {e}");
        AppError::new(ErrorCode::DatabaseError)
    })?;

    Ok(Json(services))
}

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
}

/// POST /api/admin/services
pub async fn create_service(
    State(state): State<AppState>,
    Json(req): Json<CreateServiceRequest>,
) -> ApiResult<Service> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "Name is required"));
    }
    if req.duration_minutes <= 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Duration must be a positive number of minutes",
        ));
    }

    let service = db::services::create(&state.pool, name, req.description.as_deref(), req.duration_minutes)
        .await
        .map_err(|e| {
            tracing::error!("Create service error: {e}");
            AppError::new(ErrorCode::DatabaseError)
        })?;

    Ok(Json(service))
}

#[derive(Deserialize)]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub is_active: Option<bool>,
}

/// PATCH /api/admin/services/:id
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateServiceRequest>,
) -> ApiResult<Service> {
    if let Some(minutes) = req.duration_minutes {
        if minutes <= 0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                "Duration must be a positive number of minutes",
            ));
        }
    }

    let service = db::services::update(
        &state.pool,
        id,
        req.name.as_deref(),
        req.description.as_deref(),
        req.duration_minutes,
        req.is_active,
    )
    .await
    .map_err(|e| {
        tracing::error!("Update service error: {e}");
        AppError::new(ErrorCode::DatabaseError)
    })?
    .ok_or_else(|| AppError::new(ErrorCode::ServiceNotFound))?;

    Ok(Json(service))
}

/// DELETE /api/admin/services/:id
///
/// Soft delete: the service disappears from the public catalog but stays
/// behind existing slots and reservations.
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Service> {
    let service = db::services::soft_delete(&state.pool, id)
        .await
        .map_err(|e| {
            tracing::error!("Delete service error: {e}");
            AppError::new(ErrorCode::DatabaseError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::ServiceNotFound))?;

    Ok(Json(service))
}
