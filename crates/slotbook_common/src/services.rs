//! Service abstractions for external collaborators.
//!
//! The booking core never talks to Google, SMTP or a spreadsheet directly. It goes through
//! these traits, which keeps the workflow testable with in-process fakes and lets the
//! backend decide at startup which concrete adapters are wired in.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Type-erased collaborator error, so services can be stored as trait objects.
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl BoxedError {
    pub fn new<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        BoxedError(Box::new(err))
    }

    pub fn msg(message: impl Into<String>) -> Self {
        BoxedError(message.into().into())
    }
}

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// Creates events on an external calendar.
///
/// There is no conflict check here: the calendar accepts overlapping events and the
/// booking flow does not re-verify a slot before committing.
pub trait CalendarService: Send + Sync {
    /// Error type returned by calendar service operations.
    type Error: StdError + Send + Sync + 'static;

    /// Create an event on `calendar_id`.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error>;
}

/// Delivers messages to candidates.
pub trait NotificationService: Send + Sync {
    /// Error type returned by notification service operations.
    type Error: StdError + Send + Sync + 'static;

    /// Send an email, optionally with one attachment.
    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, NotificationResult, Self::Error>;
}

/// Supplies the director's free-text availability ranges for a department.
pub trait AvailabilityStore: Send + Sync {
    /// Error type returned when the store cannot be read.
    type Error: StdError + Send + Sync + 'static;

    /// Raw range strings such as `"10AM-6PM"`. Unknown departments yield an empty list.
    fn get_intervals(&self, department: &str) -> BoxFuture<'_, Vec<String>, Self::Error>;
}

/// The sign-up form responses sheet: read every row, mark a row as handled.
pub trait SignupSheet: Send + Sync {
    /// Error type returned when the sheet cannot be read or written.
    type Error: StdError + Send + Sync + 'static;

    /// All response rows below the header, in sheet order.
    fn read_rows(&self) -> BoxFuture<'_, Vec<SheetRow>, Self::Error>;

    /// Writes `value` into the cell of `column` (a header name) on sheet row `row`.
    fn update_cell(
        &self,
        row: usize,
        column: &str,
        value: &str,
    ) -> BoxFuture<'_, (), Self::Error>;
}

pub type DynCalendarService = Arc<dyn CalendarService<Error = BoxedError>>;
pub type DynNotificationService = Arc<dyn NotificationService<Error = BoxedError>>;
pub type DynAvailabilityStore = Arc<dyn AvailabilityStore<Error = BoxedError>>;
pub type DynSignupSheet = Arc<dyn SignupSheet<Error = BoxedError>>;

/// Wraps a concrete service and erases its error type into [`BoxedError`].
pub struct BoxedService<S>(pub S);

impl<S> BoxedService<S> {
    pub fn new(inner: S) -> Self {
        Self(inner)
    }
}

impl<S: CalendarService> CalendarService for BoxedService<S> {
    type Error = BoxedError;

    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let fut = self.0.create_event(calendar_id, event);
        Box::pin(async move { fut.await.map_err(BoxedError::new) })
    }
}

impl<S: NotificationService> NotificationService for BoxedService<S> {
    type Error = BoxedError;

    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let fut = self.0.send_email(message);
        Box::pin(async move { fut.await.map_err(BoxedError::new) })
    }
}

impl<S: AvailabilityStore> AvailabilityStore for BoxedService<S> {
    type Error = BoxedError;

    fn get_intervals(&self, department: &str) -> BoxFuture<'_, Vec<String>, Self::Error> {
        let fut = self.0.get_intervals(department);
        Box::pin(async move { fut.await.map_err(BoxedError::new) })
    }
}

impl<S: SignupSheet> SignupSheet for BoxedService<S> {
    type Error = BoxedError;

    fn read_rows(&self) -> BoxFuture<'_, Vec<SheetRow>, Self::Error> {
        let fut = self.0.read_rows();
        Box::pin(async move { fut.await.map_err(BoxedError::new) })
    }

    fn update_cell(
        &self,
        row: usize,
        column: &str,
        value: &str,
    ) -> BoxFuture<'_, (), Self::Error> {
        let fut = self.0.update_cell(row, column, value);
        Box::pin(async move { fut.await.map_err(BoxedError::new) })
    }
}

/// Provides the collaborators enabled for this deployment.
pub trait ServiceFactory: Send + Sync {
    /// Calendar used to commit bookings.
    fn calendar_service(&self) -> Option<DynCalendarService>;

    /// Channel used to deliver invites.
    fn notification_service(&self) -> Option<DynNotificationService>;

    /// Source of availability ranges.
    fn availability_store(&self) -> Option<DynAvailabilityStore>;

    /// Sign-up responses processed by intake.
    fn signup_sheet(&self) -> Option<DynSignupSheet>;
}

/// An event to create on the external calendar, in local civil time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarEvent {
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// IANA zone the civil times belong to.
    pub time_zone: String,
}

/// Represents the result of a calendar event operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEventResult {
    /// The ID of the event.
    pub event_id: Option<String>,
    /// The status of the event.
    pub status: String,
    /// Link to the event in the calendar UI, when the provider returns one.
    pub html_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailAttachment {
    pub filename: String,
    /// Full MIME type including parameters, e.g. `text/calendar; method=REQUEST`.
    pub content_type: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// HTML rendering of the same content, sent as a multipart/alternative.
    #[serde(default)]
    pub html_body: Option<String>,
    pub reply_to: Option<String>,
    pub attachment: Option<EmailAttachment>,
}

/// One sheet row keyed by header cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SheetRow {
    /// 1-based row number in the sheet; the header is row 1.
    pub row: usize,
    pub cells: HashMap<String, String>,
}

impl SheetRow {
    /// Trimmed cell under `column`, empty when the row is short or the column unknown.
    pub fn get(&self, column: &str) -> &str {
        self.cells.get(column).map(|v| v.trim()).unwrap_or("")
    }
}

/// Represents the result of a notification operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Provider message id, when one is reported.
    pub id: Option<String>,
    pub status: String,
}
