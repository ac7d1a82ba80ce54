// --- File: crates/slotbook_smtp/src/lib.rs ---
pub mod service;

pub use service::{SmtpError, SmtpNotificationService};
