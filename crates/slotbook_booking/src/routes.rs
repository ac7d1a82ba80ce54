// --- File: crates/slotbook_booking/src/routes.rs ---
use crate::handlers::{
    book_handler, confirm_handler, decline_handler, get_slots_handler, intake_handler,
    BookingState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing the slot selection, booking and sign-up intake routes.
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route("/slots", get(get_slots_handler))
        .route("/confirm", post(confirm_handler))
        .route("/confirm/decline", post(decline_handler))
        .route("/book", post(book_handler))
        .route("/intake", post(intake_handler))
        .with_state(state)
}
