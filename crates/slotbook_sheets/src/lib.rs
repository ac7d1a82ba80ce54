// --- File: crates/slotbook_sheets/src/lib.rs ---
pub mod auth;
pub mod signup;
pub mod store;

pub use auth::{AccessTokenSource, ServiceAccountTokens, StaticToken};
pub use signup::{column_letter, rows_from_values, SheetsSignupSheet};
pub use store::{department_column, SheetsAvailabilityStore, SheetsError, ValueRange};
