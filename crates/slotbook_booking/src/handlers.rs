// --- File: crates/slotbook_booking/src/handlers.rs ---
use crate::departments::DepartmentDirectory;
use crate::intake::{IntakeReport, SignupIntake};
use crate::settings::BookingSettings;
use crate::view::{build_view, Candidate, SlotAvailabilityView};
use crate::workflow::{BookingRequest, BookingWorkflow, ConfirmationRecap, NotificationOutcome};
use axum::{
    extract::{Query, State},
    response::{Json, Redirect},
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use slotbook_common::error::{validation_error, SlotbookError};
use slotbook_common::services::{
    DynAvailabilityStore, DynCalendarService, DynNotificationService, DynSignupSheet,
    ServiceFactory,
};
use slotbook_config::AppConfig;
use std::sync::Arc;
use tracing::info;

// Shared state for the booking routes
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub settings: Arc<BookingSettings>,
    pub directory: Arc<DepartmentDirectory>,
    pub calendar: Option<DynCalendarService>,
    pub notifier: Option<DynNotificationService>,
    pub availability: Option<DynAvailabilityStore>,
    pub signups: Option<DynSignupSheet>,
}

impl BookingState {
    pub fn new(config: Arc<AppConfig>, services: &dyn ServiceFactory) -> Self {
        Self {
            settings: Arc::new(BookingSettings::from_config(&config.booking)),
            directory: Arc::new(DepartmentDirectory::from_config(&config.booking)),
            calendar: services.calendar_service(),
            notifier: services.notification_service(),
            availability: services.availability_store(),
            signups: services.signup_sheet(),
            config,
        }
    }
}

/// Query for the slot selection view. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotQuery {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub dept: Option<String>,
    /// YYYY-MM-DD, tomorrow when absent.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookSlotRequest {
    #[serde(default)]
    pub booking_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2025-01-15T10:00:00"))]
    pub start_time: NaiveDateTime,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2025-01-15T10:30:00"))]
    pub end_time: NaiveDateTime,
}

impl BookSlotRequest {
    fn into_request(self) -> Result<BookingRequest, SlotbookError> {
        Ok(BookingRequest::propose(
            self.booking_id,
            self.name,
            self.email,
            self.department,
            self.start_time,
            self.end_time,
        )?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    pub event_id: Option<String>,
    pub html_link: Option<String>,
    /// "sent" or "failed"
    pub notification: String,
    pub message: String,
}

/// Handler for the slot selection view.
pub async fn get_slots_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<SlotAvailabilityView>, SlotbookError> {
    let date = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| validation_error("Invalid date format (YYYY-MM-DD)"))?,
        None => state.settings.earliest_date(),
    };

    let department = match query.dept.as_deref().map(str::trim) {
        Some(dept) if !dept.is_empty() => dept.to_string(),
        _ => state.directory.default_department().to_string(),
    };

    let candidate = Candidate {
        id: query.id.unwrap_or_default(),
        name: query.name.unwrap_or_default(),
        email: query.email.unwrap_or_default(),
    };

    let view = build_view(
        &state.settings,
        state.availability.as_deref(),
        candidate,
        department,
        date,
    )
    .await;
    Ok(Json(view))
}

/// Handler that recaps a chosen slot for the candidate to confirm.
pub async fn confirm_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<BookSlotRequest>,
) -> Result<Json<ConfirmationRecap>, SlotbookError> {
    let booking = payload.into_request()?.confirm(&state.directory);
    info!(
        "Confirming {} for {} at {}",
        booking.candidate_email(),
        booking.department().name,
        booking.slot().start
    );
    Ok(Json(booking.recap()))
}

/// Handler for "No, pick another time": back to slot selection with the same details.
pub async fn decline_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<BookSlotRequest>,
) -> Result<Redirect, SlotbookError> {
    let booking = payload.into_request()?.confirm(&state.directory);
    let target = booking
        .decline()
        .redirect_target(&state.settings.selection_path)?;
    info!("Booking declined, redirecting to {}", target);
    Ok(Redirect::to(&target))
}

/// Handler that commits a confirmed booking.
pub async fn book_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<BookSlotRequest>,
) -> Result<Json<BookingResponse>, SlotbookError> {
    let calendar = state.calendar.clone().ok_or_else(|| {
        SlotbookError::ServiceUnavailable("Calendar service is disabled.".to_string())
    })?;

    let booking = payload.into_request()?.confirm(&state.directory);
    let workflow = BookingWorkflow::new(state.settings.clone(), calendar, state.notifier.clone());
    let committed = workflow.commit(booking).await?;

    let message = match committed.notification {
        NotificationOutcome::Sent => "A calendar invite has been sent to your email!",
        NotificationOutcome::Failed { .. } => "Check your email for confirmation.",
    };

    Ok(Json(BookingResponse {
        success: true,
        event_id: committed.calendar.event_id,
        html_link: committed.calendar.html_link,
        notification: committed.notification.as_str().to_string(),
        message: message.to_string(),
    }))
}

/// Handler that welcomes new sign-ups and marks their rows.
pub async fn intake_handler(
    State(state): State<Arc<BookingState>>,
) -> Result<Json<IntakeReport>, SlotbookError> {
    let unavailable =
        |what: &str| SlotbookError::ServiceUnavailable(format!("{} is disabled.", what));

    let config = state
        .config
        .intake
        .clone()
        .ok_or_else(|| unavailable("Sign-up intake"))?;
    let sheet = state.signups.clone().ok_or_else(|| unavailable("Sign-up sheet"))?;
    let notifier = state
        .notifier
        .clone()
        .ok_or_else(|| unavailable("Notification service"))?;

    let intake = SignupIntake::new(
        sheet,
        notifier,
        state.directory.clone(),
        config,
        state.settings.organization_name.clone(),
    );
    let report = intake.run().await?;
    info!(
        "Intake pass done: {} of {} new sign-ups welcomed",
        report.welcomed, report.pending
    );
    Ok(Json(report))
}
