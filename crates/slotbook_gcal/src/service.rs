// --- File: crates/slotbook_gcal/src/service.rs ---
//! Google Calendar implementation of [`CalendarService`].

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use google_calendar3::api::{Event, EventDateTime};
use slotbook_common::services::{BoxFuture, CalendarEvent, CalendarEventResult, CalendarService};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::auth::HubType;

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
    #[error("Local time {0} does not exist in {1}")]
    NonexistentLocalTime(NaiveDateTime, String),
    #[error("End time must be after start time")]
    InvalidRange,
}

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
}

impl GoogleCalendarService {
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self { calendar_hub }
    }
}

/// Resolves a civil time in `tz` to an instant. Ambiguous times take the earlier offset.
pub fn local_to_utc(at: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, GcalServiceError> {
    tz.from_local_datetime(&at)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| GcalServiceError::NonexistentLocalTime(at, tz.name().to_string()))
}

/// Builds the API event for a booking.
pub fn to_google_event(event: CalendarEvent) -> Result<Event, GcalServiceError> {
    let tz = Tz::from_str(&event.time_zone)
        .map_err(|_| GcalServiceError::UnknownTimeZone(event.time_zone.clone()))?;

    let start = local_to_utc(event.start, tz)?;
    let end = local_to_utc(event.end, tz)?;
    if end <= start {
        return Err(GcalServiceError::InvalidRange);
    }

    Ok(Event {
        summary: Some(event.summary),
        description: event.description,
        location: event.location,
        start: Some(EventDateTime {
            date_time: Some(start),
            time_zone: Some(event.time_zone.clone()),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date_time: Some(end),
            time_zone: Some(event.time_zone),
            ..Default::default()
        }),
        ..Default::default()
    })
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    /// Inserts the event on `calendar_id`. No conflict check is made.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let new_event = to_google_event(event)?;

            let (_response, created_event) = calendar_hub
                .events()
                .insert(new_event, &calendar_id)
                .doit()
                .await?;

            info!(
                "Google Calendar event {:?} created on {}",
                created_event.id, calendar_id
            );

            Ok(CalendarEventResult {
                event_id: created_event.id,
                status: created_event
                    .status
                    .unwrap_or_else(|| "confirmed".to_string()),
                html_link: created_event.html_link,
            })
        })
    }
}
