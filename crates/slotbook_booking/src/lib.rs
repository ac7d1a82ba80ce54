// --- File: crates/slotbook_booking/src/lib.rs ---
pub mod availability;
pub mod departments;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod intake;
pub mod invite;
pub mod routes;
pub mod settings;
pub mod slots;
#[cfg(test)]
mod slots_proptest;
pub mod static_store;
#[cfg(test)]
mod test_support;
pub mod view;
pub mod workflow;

pub use handlers::BookingState;
pub use routes::routes;
