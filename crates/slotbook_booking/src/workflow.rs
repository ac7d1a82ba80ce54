// --- File: crates/slotbook_booking/src/workflow.rs ---
//! Booking lifecycle: a proposed slot is confirmed by the candidate, then either
//! declined (back to slot selection) or committed to the calendar.
//!
//! Each stage is its own type, so a booking cannot be committed without having been
//! confirmed first.

use crate::departments::{DepartmentDirectory, DepartmentProfile};
use crate::invite::{create_invite_document, invite_email};
use crate::settings::BookingSettings;
use crate::slots::TimeSlot;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use slotbook_common::error::{external_service_error, internal_error, SlotbookError};
use slotbook_common::services::{
    BoxedError, CalendarEvent, CalendarEventResult, DynCalendarService, DynNotificationService,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Invalid booking request: {0}")]
    InvalidRequest(String),

    #[error("Calendar event creation failed: {0}")]
    Calendar(#[source] BoxedError),

    #[error("Failed to build redirect: {0}")]
    Redirect(#[from] serde_urlencoded::ser::Error),
}

impl From<BookingError> for SlotbookError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::InvalidRequest(msg) => SlotbookError::ValidationError(msg),
            BookingError::Calendar(e) => external_service_error("calendar", e),
            BookingError::Redirect(e) => internal_error(e),
        }
    }
}

/// A slot the candidate picked, not yet confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    booking_id: String,
    candidate_name: String,
    candidate_email: String,
    department: String,
    slot: TimeSlot,
}

impl BookingRequest {
    pub fn propose(
        booking_id: impl Into<String>,
        candidate_name: impl Into<String>,
        candidate_email: impl Into<String>,
        department: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, BookingError> {
        let candidate_name = candidate_name.into().trim().to_string();
        let candidate_email = candidate_email.into().trim().to_string();

        if candidate_name.is_empty() {
            return Err(BookingError::InvalidRequest("name is required".into()));
        }
        if candidate_email.is_empty() {
            return Err(BookingError::InvalidRequest("email is required".into()));
        }
        if end <= start {
            return Err(BookingError::InvalidRequest(
                "end_time must be after start_time".into(),
            ));
        }

        Ok(Self {
            booking_id: booking_id.into(),
            candidate_name,
            candidate_email,
            department: department.into(),
            slot: TimeSlot::from_bounds(start, end),
        })
    }

    /// Attaches the resolved department. Unknown departments fall back to defaults.
    pub fn confirm(self, directory: &DepartmentDirectory) -> ConfirmedBooking {
        let department = directory.resolve(&self.department);
        ConfirmedBooking {
            request: self,
            department,
        }
    }

    pub fn slot(&self) -> &TimeSlot {
        &self.slot
    }
}

/// A booking the candidate is looking at on the confirmation page.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedBooking {
    request: BookingRequest,
    department: DepartmentProfile,
}

impl ConfirmedBooking {
    pub fn booking_id(&self) -> &str {
        &self.request.booking_id
    }

    pub fn candidate_name(&self) -> &str {
        &self.request.candidate_name
    }

    pub fn candidate_email(&self) -> &str {
        &self.request.candidate_email
    }

    pub fn slot(&self) -> &TimeSlot {
        &self.request.slot
    }

    pub fn department(&self) -> &DepartmentProfile {
        &self.department
    }

    /// The details shown back to the candidate before they commit.
    pub fn recap(&self) -> ConfirmationRecap {
        let slot = self.slot();
        ConfirmationRecap {
            booking_id: self.booking_id().to_string(),
            name: self.candidate_name().to_string(),
            email: self.candidate_email().to_string(),
            department: self.department.name.clone(),
            date: slot.start.format("%B %d, %Y").to_string(),
            time_range: format!(
                "{} - {}",
                slot.start.format("%I:%M %p"),
                slot.end.format("%I:%M %p")
            ),
            location: self.department.location.clone(),
            start: slot.start,
            end: slot.end,
        }
    }

    /// Goes back to slot selection for the same candidate and date. Nothing is persisted.
    pub fn decline(self) -> SlotSelectionQuery {
        SlotSelectionQuery {
            id: self.request.booking_id,
            name: self.request.candidate_name,
            email: self.request.candidate_email,
            dept: self.department.name,
            date: self.request.slot.date(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConfirmationRecap {
    pub booking_id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    /// e.g. "January 15, 2025"
    pub date: String,
    /// e.g. "10:00 AM - 10:30 AM"
    pub time_range: String,
    pub location: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub start: NaiveDateTime,
    #[cfg_attr(feature = "openapi", schema(value_type = String))]
    pub end: NaiveDateTime,
}

/// Query string that reopens slot selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotSelectionQuery {
    pub id: String,
    pub name: String,
    pub email: String,
    pub dept: String,
    pub date: NaiveDate,
}

impl SlotSelectionQuery {
    pub fn redirect_target(&self, selection_path: &str) -> Result<String, BookingError> {
        let query = serde_urlencoded::to_string(self)?;
        Ok(format!("{}?{}", selection_path, query))
    }
}

/// Whether the invite reached the notification channel. Never fails the booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NotificationOutcome {
    Sent,
    Failed { reason: String },
}

impl NotificationOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed { .. } => "failed",
        }
    }
}

/// A booking with a calendar event behind it.
#[derive(Debug, Clone)]
pub struct CommittedBooking {
    pub booking: ConfirmedBooking,
    pub calendar: CalendarEventResult,
    pub notification: NotificationOutcome,
}

/// Commits confirmed bookings: calendar event first, then the invite.
#[derive(Clone)]
pub struct BookingWorkflow {
    settings: Arc<BookingSettings>,
    calendar: DynCalendarService,
    notifier: Option<DynNotificationService>,
}

impl BookingWorkflow {
    pub fn new(
        settings: Arc<BookingSettings>,
        calendar: DynCalendarService,
        notifier: Option<DynNotificationService>,
    ) -> Self {
        Self {
            settings,
            calendar,
            notifier,
        }
    }

    /// The calendar event for a booking, in local time of the configured zone.
    pub fn calendar_event(&self, booking: &ConfirmedBooking) -> CalendarEvent {
        let mut description = format!(
            "Candidate: {}\nEmail: {}\nDepartment: {}",
            booking.candidate_name(),
            booking.candidate_email(),
            booking.department().name
        );
        if !booking.booking_id().is_empty() {
            description.push_str(&format!("\nBooking ID: {}", booking.booking_id()));
        }
        if let Some(note) = &self.settings.location_note {
            description.push_str("\n\n");
            description.push_str(note);
        }

        CalendarEvent {
            summary: format!(
                "{} {} Interview - {}",
                self.settings.organization,
                booking.department().name,
                booking.candidate_name()
            ),
            description: Some(description),
            location: Some(booking.department().location.clone()),
            start: booking.slot().start,
            end: booking.slot().end,
            time_zone: self.settings.time_zone.name().to_string(),
        }
    }

    pub async fn commit(&self, booking: ConfirmedBooking) -> Result<CommittedBooking, BookingError> {
        self.commit_at(booking, Utc::now()).await
    }

    /// Like [`Self::commit`] with an explicit invite timestamp.
    ///
    /// A calendar failure aborts before any email is attempted. Once the event exists the
    /// invite is sent exactly once and its failure is only reported, never raised.
    pub async fn commit_at(
        &self,
        booking: ConfirmedBooking,
        stamp: DateTime<Utc>,
    ) -> Result<CommittedBooking, BookingError> {
        let calendar_id = booking.department().calendar_id.clone();
        info!(
            "Creating calendar event for {} ({}) on {}",
            booking.candidate_email(),
            booking.department().name,
            calendar_id
        );

        let calendar = self
            .calendar
            .create_event(&calendar_id, self.calendar_event(&booking))
            .await
            .map_err(|e| {
                error!("Calendar event creation failed for {}: {}", calendar_id, e);
                BookingError::Calendar(e)
            })?;

        info!("Calendar event created: {:?}", calendar.event_id);

        let notification = self.send_invite(&booking, stamp).await;

        Ok(CommittedBooking {
            booking,
            calendar,
            notification,
        })
    }

    async fn send_invite(&self, booking: &ConfirmedBooking, stamp: DateTime<Utc>) -> NotificationOutcome {
        let Some(notifier) = &self.notifier else {
            warn!("No notification service configured; invite not sent");
            return NotificationOutcome::Failed {
                reason: "notification service not configured".into(),
            };
        };

        let ics = create_invite_document(booking, &self.settings, stamp);
        let message = invite_email(booking, &self.settings, ics);

        match notifier.send_email(message).await {
            Ok(result) => {
                info!("Invite sent to {} ({})", booking.candidate_email(), result.status);
                NotificationOutcome::Sent
            }
            Err(e) => {
                warn!("Invite to {} failed: {}", booking.candidate_email(), e);
                NotificationOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
