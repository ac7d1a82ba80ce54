// --- File: crates/slotbook_common/src/lib.rs ---

pub mod error; // Error handling
pub mod features; // Runtime feature checks
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod routes; // Health and welcome routes
pub mod services; // Collaborator abstractions

pub use routes::routes;

pub use error::{
    external_service_error, internal_error, validation_error, HttpStatusCode,
    SlotbookError,
};

pub use http::{client::create_client, IntoHttpResponse};

pub use logging::{init, init_with_level, log_result};

pub use features::is_feature_enabled;
