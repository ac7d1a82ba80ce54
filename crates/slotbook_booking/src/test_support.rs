// --- File: crates/slotbook_booking/src/test_support.rs ---
//! Recording fakes for the collaborator traits.

use crate::departments::DepartmentDirectory;
use crate::workflow::{BookingRequest, ConfirmedBooking};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use slotbook_common::services::{
    AvailabilityStore, BoxFuture, BoxedError, CalendarEvent, CalendarEventResult, CalendarService,
    EmailMessage, NotificationResult, NotificationService, SheetRow, SignupSheet,
};
use slotbook_config::BookingConfig;
use std::sync::Mutex;

pub fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn fixed_stamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap()
}

/// A booking for 2025-01-15 at `hour:minute`, thirty minutes long.
pub fn confirmed_booking(
    name: &str,
    email: &str,
    department: &str,
    hour: u32,
    minute: u32,
) -> ConfirmedBooking {
    let start = at(15, hour, minute);
    BookingRequest::propose(
        "row-7",
        name,
        email,
        department,
        start,
        start + chrono::Duration::minutes(30),
    )
    .unwrap()
    .confirm(&DepartmentDirectory::from_config(&BookingConfig::default()))
}

#[derive(Default)]
pub struct RecordingCalendar {
    pub calls: Mutex<Vec<(String, CalendarEvent)>>,
    pub fail_with: Option<String>,
}

impl RecordingCalendar {
    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl CalendarService for RecordingCalendar {
    type Error = BoxedError;

    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((calendar_id.to_string(), event));
        let fail_with = self.fail_with.clone();
        Box::pin(async move {
            match fail_with {
                Some(msg) => Err(BoxedError::msg(msg)),
                None => Ok(CalendarEventResult {
                    event_id: Some("evt-1".into()),
                    status: "confirmed".into(),
                    html_link: Some("https://calendar.example/evt-1".into()),
                }),
            }
        })
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl NotificationService for RecordingNotifier {
    type Error = BoxedError;

    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, NotificationResult, Self::Error> {
        self.sent.lock().unwrap().push(message);
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                Err(BoxedError::msg("smtp relay refused connection"))
            } else {
                Ok(NotificationResult {
                    id: None,
                    status: "queued".into(),
                })
            }
        })
    }
}

/// Store returning fixed ranges, or failing every read.
pub struct FixedStore(pub Result<Vec<String>, String>);

impl AvailabilityStore for FixedStore {
    type Error = BoxedError;

    fn get_intervals(&self, _department: &str) -> BoxFuture<'_, Vec<String>, Self::Error> {
        let result = self.0.clone().map_err(BoxedError::msg);
        Box::pin(async move { result })
    }
}

/// Sign-up sheet holding fixed rows; records every cell write.
#[derive(Default)]
pub struct RecordingSheet {
    pub rows: Vec<SheetRow>,
    pub updates: Mutex<Vec<(usize, String, String)>>,
    pub fail_read: bool,
    pub fail_update: bool,
}

impl RecordingSheet {
    pub fn with_rows(rows: Vec<SheetRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn updated_rows(&self) -> Vec<usize> {
        self.updates.lock().unwrap().iter().map(|(row, _, _)| *row).collect()
    }
}

impl SignupSheet for RecordingSheet {
    type Error = BoxedError;

    fn read_rows(&self) -> BoxFuture<'_, Vec<SheetRow>, Self::Error> {
        let result = if self.fail_read {
            Err(BoxedError::msg("sheet quota exceeded"))
        } else {
            Ok(self.rows.clone())
        };
        Box::pin(async move { result })
    }

    fn update_cell(
        &self,
        row: usize,
        column: &str,
        value: &str,
    ) -> BoxFuture<'_, (), Self::Error> {
        self.updates
            .lock()
            .unwrap()
            .push((row, column.to_string(), value.to_string()));
        let fail = self.fail_update;
        Box::pin(async move {
            if fail {
                Err(BoxedError::msg("sheet is protected"))
            } else {
                Ok(())
            }
        })
    }
}

/// A form response row with the default intake column names.
pub fn signup_row(row: usize, name: &str, email: &str, departments: &str, sent: &str) -> SheetRow {
    let cells = [
        ("Timestamp", "1/2/2025 10:00:00"),
        ("What is your name?", name),
        ("What is your email?", email),
        ("Which department(s) do you want to be in? (Pick up to 2)", departments),
        ("Automated Email Sent", sent),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    SheetRow { row, cells }
}
