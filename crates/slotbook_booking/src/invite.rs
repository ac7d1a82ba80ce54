// --- File: crates/slotbook_booking/src/invite.rs ---
//! Calendar invite document and the email that carries it.

use crate::settings::BookingSettings;
use crate::workflow::ConfirmedBooking;
use chrono::{DateTime, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{Alarm, Calendar, Component, EventLike, Trigger};
use slotbook_common::services::{EmailAttachment, EmailMessage};

pub const INVITE_FILENAME: &str = "interview.ics";
pub const INVITE_CONTENT_TYPE: &str = "text/calendar; method=REQUEST; charset=utf-8";

const ICS_STAMP: &str = "%Y%m%dT%H%M%SZ";
const ICS_LOCAL: &str = "%Y%m%dT%H%M%S";

/// Globally unique id of the invite: `{start}-{email}@{domain}`.
pub fn invite_uid(booking: &ConfirmedBooking, settings: &BookingSettings) -> String {
    format!(
        "{}-{}@{}",
        booking.slot().start.format(ICS_LOCAL),
        booking.candidate_email(),
        settings.uid_domain
    )
}

/// Renders the single-event iCalendar document for a booking.
///
/// `stamp` becomes DTSTAMP so output is reproducible for a fixed clock.
pub fn create_invite_document(
    booking: &ConfirmedBooking,
    settings: &BookingSettings,
    stamp: DateTime<Utc>,
) -> String {
    let mut cal = Calendar::new();
    let zone = settings.time_zone;

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&invite_uid(booking, settings));
    ics_event.summary(&format!(
        "{} {} Interview",
        settings.organization,
        booking.department().name
    ));
    ics_event.add_property("DTSTAMP", stamp.format(ICS_STAMP).to_string());
    ics_event.add_property("DTSTART", utc_stamp(booking.slot().start, zone));
    ics_event.add_property("DTEND", utc_stamp(booking.slot().end, zone));
    ics_event.description(&invite_description(booking, settings));
    ics_event.location(&booking.department().location);
    ics_event.add_property("STATUS", "CONFIRMED");
    ics_event.add_property("SEQUENCE", "0");

    if settings.reminder > chrono::Duration::zero() {
        let trigger = Trigger::before_start(settings.reminder);
        ics_event.alarm(Alarm::display("Interview reminder", trigger));
    }

    cal.push(ics_event.done());
    let cal = cal.done();

    rewrite_document(&cal.to_string(), &settings.product_id, settings.reminder)
}

/// Local civil time as an ICS UTC stamp. A time inside a DST gap is shifted by the
/// offset in force at that wall-clock reading.
fn utc_stamp(at: NaiveDateTime, zone: Tz) -> String {
    let utc = match zone.from_local_datetime(&at).earliest() {
        Some(local) => local.with_timezone(&Utc).naive_utc(),
        None => {
            let offset = zone.offset_from_utc_datetime(&at).fix();
            at - chrono::Duration::seconds(i64::from(offset.local_minus_utc()))
        }
    };
    utc.format(ICS_STAMP).to_string()
}

fn invite_description(booking: &ConfirmedBooking, settings: &BookingSettings) -> String {
    let mut description = format!(
        "Interview with {} for the {} department.",
        settings.organization_name,
        booking.department().name
    );
    if let Some(note) = &settings.location_note {
        description.push_str("\n\n");
        description.push_str(note);
    }
    description
}

/// Swaps in our PRODID, marks the document as a request, writes the alarm trigger in
/// minutes and drops alarm bookkeeping lines the crate emits.
fn rewrite_document(ics: &str, product_id: &str, reminder: chrono::Duration) -> String {
    let mut result = String::with_capacity(ics.len() + 32);
    let mut in_valarm = false;

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(product_id);
            result.push_str("\r\nMETHOD:REQUEST\r\n");
            continue;
        }
        if line.starts_with("METHOD:") {
            continue;
        }

        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        }
        if in_valarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
            continue;
        }
        if in_valarm && line.starts_with("TRIGGER") {
            result.push_str(&format!("TRIGGER:-PT{}M\r\n", reminder.num_minutes()));
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }
    result
}

/// Human-readable start, e.g. "January 15, 2025 at 10:00 AM CST".
pub fn format_interview_time(start: NaiveDateTime, settings: &BookingSettings) -> String {
    format!(
        "{} {}",
        start.format("%B %d, %Y at %I:%M %p"),
        settings.zone_abbreviation(start)
    )
}

/// The invite email for a booking, with the ICS document attached.
pub fn invite_email(
    booking: &ConfirmedBooking,
    settings: &BookingSettings,
    ics: String,
) -> EmailMessage {
    let department = &booking.department().name;
    let mut body = format!(
        "Dear {name},\n\n\
         Thank you for scheduling your interview with the {org_name} ({org}) {department} department.\n\n\
         Your interview is scheduled for {when}.\n\
         Location: {location}\n",
        name = booking.candidate_name(),
        org_name = settings.organization_name,
        org = settings.organization,
        department = department,
        when = format_interview_time(booking.slot().start, settings),
        location = booking.department().location,
    );
    if let Some(note) = &settings.location_note {
        body.push('\n');
        body.push_str(note);
        body.push('\n');
    }
    body.push_str(
        "\nA calendar invitation is attached to this email. \
         Please add it to your calendar.\n\n\
         We look forward to meeting you!\n\n\
         Best regards,\n",
    );
    body.push_str(&format!("{} {} Team\n", settings.organization, department));

    EmailMessage {
        to: booking.candidate_email().to_string(),
        subject: format!("Your {} {} Interview", settings.organization, department),
        body,
        html_body: None,
        reply_to: Some(booking.department().contact_email.clone()),
        attachment: Some(EmailAttachment {
            filename: INVITE_FILENAME.to_string(),
            content_type: INVITE_CONTENT_TYPE.to_string(),
            content: ics,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::departments::DepartmentDirectory;
    use crate::test_support::{confirmed_booking, fixed_stamp};
    use crate::workflow::BookingRequest;
    use slotbook_config::BookingConfig;

    #[test]
    fn document_carries_event_fields() {
        let settings = BookingSettings::default();
        let booking = confirmed_booking("Jane Doe", "jane@example.com", "Tech", 10, 0);
        let ics = create_invite_document(&booking, &settings, fixed_stamp());

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.contains("PRODID:-//SBI//Interview Scheduler//EN\r\n"));
        assert!(ics.contains("METHOD:REQUEST\r\n"));
        assert!(ics.contains("UID:20250115T100000-jane@example.com@utsbi.org\r\n"));
        assert!(ics.contains("DTSTAMP:20250110T120000Z\r\n"));
        assert!(ics.contains("DTSTART:20250115T160000Z\r\n"));
        assert!(ics.contains("DTEND:20250115T163000Z\r\n"));
        assert!(!ics.contains("TZID"));
        assert!(ics.contains("SUMMARY:SBI Tech Interview\r\n"));
        assert!(ics.contains("STATUS:CONFIRMED\r\n"));
        assert!(ics.contains("SEQUENCE:0\r\n"));
        assert!(ics.contains("BEGIN:VALARM"));
        assert!(ics.contains("TRIGGER:-PT30M\r\n"));
        assert!(!ics.contains("PT1800S"));
        assert!(ics.trim_end().ends_with("END:VCALENDAR"));
    }

    #[test]
    fn document_is_stable_for_fixed_stamp() {
        let settings = BookingSettings::default();
        let booking = confirmed_booking("Jane Doe", "jane@example.com", "Tech", 10, 0);
        let first = create_invite_document(&booking, &settings, fixed_stamp());
        let second = create_invite_document(&booking, &settings, fixed_stamp());
        assert_eq!(first, second);
    }

    #[test]
    fn summer_times_use_daylight_offset() {
        let settings = BookingSettings::default();
        let start = chrono::NaiveDate::from_ymd_opt(2025, 7, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let booking = BookingRequest::propose(
            "row-9",
            "Jane Doe",
            "jane@example.com",
            "Tech",
            start,
            start + chrono::Duration::minutes(30),
        )
        .unwrap()
        .confirm(&DepartmentDirectory::from_config(&BookingConfig::default()));

        let ics = create_invite_document(&booking, &settings, fixed_stamp());
        assert!(ics.contains("DTSTART:20250715T150000Z\r\n"));
        assert!(ics.contains("DTEND:20250715T153000Z\r\n"));
    }

    #[test]
    fn gap_time_is_shifted_not_dropped() {
        let zone: Tz = "America/Chicago".parse().unwrap();
        let gap = chrono::NaiveDate::from_ymd_opt(2025, 3, 9)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert_eq!(utc_stamp(gap, zone), "20250309T083000Z");
    }

    #[test]
    fn longer_reminder_is_written_in_minutes() {
        let settings = BookingSettings {
            reminder: chrono::Duration::minutes(90),
            ..BookingSettings::default()
        };
        let booking = confirmed_booking("Jane Doe", "jane@example.com", "Tech", 10, 0);
        let ics = create_invite_document(&booking, &settings, fixed_stamp());
        assert!(ics.contains("TRIGGER:-PT90M\r\n"));
    }

    #[test]
    fn zero_reminder_omits_alarm() {
        let settings = BookingSettings {
            reminder: chrono::Duration::zero(),
            ..BookingSettings::default()
        };
        let booking = confirmed_booking("Jane Doe", "jane@example.com", "Tech", 10, 0);
        let ics = create_invite_document(&booking, &settings, fixed_stamp());
        assert!(!ics.contains("BEGIN:VALARM"));
    }

    #[test]
    fn email_addresses_candidate_and_attaches_invite() {
        let settings = BookingSettings::default();
        let booking = confirmed_booking("Jane Doe", "jane@example.com", "Finance", 14, 30);
        let email = invite_email(&booking, &settings, "ICS".into());

        assert_eq!(email.to, "jane@example.com");
        assert_eq!(email.subject, "Your SBI Finance Interview");
        assert!(email.body.starts_with("Dear Jane Doe,"));
        assert!(email.body.contains("January 15, 2025 at 02:30 PM CST"));
        assert!(email.body.contains("SBI Finance Team"));

        let attachment = email.attachment.expect("invite attached");
        assert_eq!(attachment.filename, "interview.ics");
        assert_eq!(attachment.content_type, INVITE_CONTENT_TYPE);
        assert_eq!(attachment.content, "ICS");
    }
}
