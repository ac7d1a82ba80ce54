// --- File: crates/slotbook_common/src/routes.rs ---
use axum::{routing::get, Router};

/// Routes every deployment exposes regardless of enabled collaborators.
pub fn routes() -> Router {
    Router::new()
        .route("/", get(|| async { "Welcome to the interview booking API!" }))
        .route("/health", get(|| async { "ok" }))
}
