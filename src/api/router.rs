use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, booking_summary, comment_eligibility, create_booking, decide_booking, get_booking,
    list_booker_bookings, list_owner_bookings,
};

/// Creates the API router with all booking endpoints
///
/// Every endpoint except `/health` identifies the acting user by the
/// `X-Sharer-User-Id` header.
///
/// - POST /bookings - Request a booking
/// - GET /bookings - List bookings as the booker
/// - GET /bookings/owner - List bookings of owned items
/// - GET /bookings/:id - Get a booking
/// - PATCH /bookings/:id?approved= - Approve or reject a booking
/// - GET /items/:id/booking-summary - Last and next approved booking starts
/// - GET /items/:id/comment-eligibility - Whether the user may comment on the item
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/bookings", post(create_booking).get(list_booker_bookings))
        .route("/bookings/owner", get(list_owner_bookings))
        .route("/bookings/:id", get(get_booking).patch(decide_booking))
        .route("/items/:id/booking-summary", get(booking_summary))
        .route("/items/:id/comment-eligibility", get(comment_eligibility))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
