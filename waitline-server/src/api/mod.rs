//! API routes for waitline-server

pub mod auth;
pub mod health;
pub mod queue;
pub mod reservations;
pub mod services;
pub mod timeslots;

use axum::routing::{get, patch, post};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_admin, user_auth_middleware};
use crate::state::AppState;

/// Result alias for API handlers
pub type ApiResult<T> = Result<axum::Json<T>, shared::error::AppError>;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Public reads and account endpoints (no auth)
    let public = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/services", get(services::list_services))
        .route("/api/timeslots/{service_id}", get(timeslots::list_time_slots));

    // Customer surface (JWT authenticated)
    let customer = Router::new()
        .route(
            "/api/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/api/reservations/{id}",
            get(reservations::get_reservation)
                .patch(reservations::update_reservation)
                .delete(reservations::cancel_reservation),
        )
        .route("/api/queue", get(queue::list_queue))
        .route("/api/queue/checkin", post(queue::check_in))
        .route("/api/queue/{id}/cancel", post(queue::cancel_entry))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            user_auth_middleware,
        ));

    // Admin surface (JWT authenticated + admin role)
    let admin = Router::new()
        .route("/api/admin/services", post(services::create_service))
        .route(
            "/api/admin/services/{id}",
            patch(services::update_service).delete(services::delete_service),
        )
        .route("/api/admin/timeslots", post(timeslots::create_time_slot))
        .route("/api/admin/queue/advance/{id}", post(queue::advance_queue))
        .route(
            "/api/admin/queue/{id}/complete",
            post(queue::complete_entry),
        )
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            user_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public)
        .merge(customer)
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
