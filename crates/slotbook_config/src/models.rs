// --- File: crates/slotbook_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    pub key_path: Option<String>, // Path to the service account JSON key
}

// --- SMTP Config ---
// The password is usually "secret_from_env" and resolved from SMTP_PASSWORD.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub from_name: Option<String>,
}

fn default_smtp_port() -> u16 {
    587
}

// --- Google Sheets availability source ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    /// A1 range holding department names in the first row, e.g. "Availability!A1:H50"
    pub range: String,
    pub api_key: String, // SHEETS_API_KEY via "secret_from_env"
    pub base_url: Option<String>,
}

/// Identity and meeting place for one department.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DepartmentConfig {
    pub name: String,
    /// Calendar that receives the interview event. Falls back to `default_calendar_id`.
    pub calendar_id: Option<String>,
    /// Reply-to address for invites. Falls back to the calendar id.
    pub contact_email: Option<String>,
    /// Falls back to `default_location`.
    pub location: Option<String>,
    /// One-line summary used in the sign-up welcome email.
    #[serde(default)]
    pub description: Option<String>,
}

/// Slot grid, department directory and invite settings.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct BookingConfig {
    /// IANA zone name all civil times are interpreted in.
    pub time_zone: String,
    /// First slot start, "HH:MM".
    pub day_start: String,
    /// Last slot end, "HH:MM".
    pub day_end: String,
    pub slot_minutes: i64,
    pub reminder_minutes: i64,
    /// Where a declined confirmation sends the candidate back to.
    pub selection_path: String,
    /// Short name used in summaries ("SBI Tech Interview").
    pub organization: String,
    pub organization_name: String,
    pub uid_domain: String,
    pub product_id: String,
    pub default_department: String,
    pub default_calendar_id: String,
    pub default_location: String,
    pub location_note: Option<String>,
    pub departments: Vec<DepartmentConfig>,
    /// Static availability ranges keyed by department name.
    pub availability: HashMap<String, Vec<String>>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            time_zone: "America/Chicago".to_string(),
            day_start: "09:00".to_string(),
            day_end: "21:00".to_string(),
            slot_minutes: 30,
            reminder_minutes: 30,
            selection_path: "/".to_string(),
            organization: "SBI".to_string(),
            organization_name: "Sustainable Building Initiative".to_string(),
            uid_domain: "utsbi.org".to_string(),
            product_id: "-//SBI//Interview Scheduler//EN".to_string(),
            default_department: "Tech".to_string(),
            default_calendar_id: "primary".to_string(),
            default_location: "McCombs School of Business, 2110 Speedway, Austin, TX 78705, USA"
                .to_string(),
            location_note: Some(
                "We will message you through text beforehand about the exact location, or if the location changes."
                    .to_string(),
            ),
            departments: Vec::new(),
            availability: HashMap::new(),
        }
    }
}

// --- Sign-up intake ---
/// Where new sign-ups are read from and how the welcome email is worded.
///
/// Column names are the sheet's header cells, matched exactly as the form writes them.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct IntakeConfig {
    pub spreadsheet_id: String,
    /// Tab holding the form responses; the first row is the header.
    pub sheet_name: String,
    /// Service account key with edit access to the sheet. Falls back to `gcal.key_path`.
    pub key_path: Option<String>,
    pub base_url: Option<String>,
    pub name_column: String,
    pub email_column: String,
    pub departments_column: String,
    pub sent_column: String,
    /// Written into `sent_column` once the welcome email is out.
    pub sent_marker: String,
    pub subject: String,
    /// Address offered for questions in the welcome email.
    pub contact_email: Option<String>,
    pub website: Option<String>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            sheet_name: "Form Responses 1".to_string(),
            key_path: None,
            base_url: None,
            name_column: "What is your name?".to_string(),
            email_column: "What is your email?".to_string(),
            departments_column: "Which department(s) do you want to be in? (Pick up to 2)"
                .to_string(),
            sent_column: "Automated Email Sent".to_string(),
            sent_marker: "Yes".to_string(),
            subject: "Next Steps With SBI!".to_string(),
            contact_email: None,
            website: Some("https://utsbi.org".to_string()),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,
    #[serde(default)]
    pub use_smtp: bool,
    #[serde(default)]
    pub use_sheets: bool,
    #[serde(default)]
    pub use_intake: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    #[serde(default)]
    pub sheets: Option<SheetsConfig>,
    #[serde(default)]
    pub intake: Option<IntakeConfig>,

    #[serde(default)]
    pub booking: BookingConfig,
}
