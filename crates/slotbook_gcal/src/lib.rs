// --- File: crates/slotbook_gcal/src/lib.rs ---
pub mod auth;
#[cfg(test)]
mod auth_test;
pub mod service;
#[cfg(test)]
mod service_test;

pub use auth::{create_calendar_hub, HubType};
pub use service::{GcalServiceError, GoogleCalendarService};
