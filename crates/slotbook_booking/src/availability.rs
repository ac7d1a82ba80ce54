// --- File: crates/slotbook_booking/src/availability.rs ---
//! Parsing and applying a director's free-text availability.
//!
//! Directors type ranges like `"10AM-6PM"` or `"1:30pm-4pm"` into a sheet. Anything that
//! does not parse is skipped with a debug log; one bad cell never hides the rest.

use crate::slots::TimeSlot;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use slotbook_common::services::{AvailabilityStore, BoxedError};
use std::fmt;
use tracing::{debug, warn};

static TIME_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})(?::(\d{2}))?\s*([AaPp][Mm])$").expect("time token pattern is valid")
});

/// Parses a 12-hour clock token such as `"10AM"`, `"6:15pm"` or `"12 AM"` into a
/// 24-hour `(hour, minute)` pair.
///
/// 12AM is midnight and 12PM is noon. Returns `None` for hours outside 1..=12, minutes
/// outside 0..=59, or anything without an AM/PM suffix.
pub fn parse_time_token(token: &str) -> Option<(u32, u32)> {
    let caps = TIME_TOKEN.captures(token.trim())?;

    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }

    let is_pm = caps.get(3)?.as_str().eq_ignore_ascii_case("pm");
    let hour = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    Some((hour, minute))
}

/// A time-of-day window with no date attached.
///
/// An end of `00:00` means midnight at the close of the day, so `"9PM-12AM"` is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityInterval {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl AvailabilityInterval {
    /// Parses `"<token>-<token>"`. Inverted or empty windows are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.trim().split('-');
        let (start, end) = match (parts.next(), parts.next(), parts.next()) {
            (Some(start), Some(end), None) => (start, end),
            _ => return None,
        };

        let (sh, sm) = parse_time_token(start)?;
        let (eh, em) = parse_time_token(end)?;
        let interval = Self {
            start: NaiveTime::from_hms_opt(sh, sm, 0)?,
            end: NaiveTime::from_hms_opt(eh, em, 0)?,
        };

        if interval.ends_at_midnight() || interval.end > interval.start {
            Some(interval)
        } else {
            None
        }
    }

    fn ends_at_midnight(&self) -> bool {
        self.end == NaiveTime::MIN && self.start != NaiveTime::MIN
    }

    /// The window placed on a concrete date.
    pub fn on(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = date.and_time(self.start);
        let end = if self.ends_at_midnight() {
            // the last representable date has no following midnight
            date.succ_opt()
                .map(|next| next.and_time(NaiveTime::MIN))
                .or_else(|| date.and_hms_opt(23, 59, 59))
                .unwrap_or(start)
        } else {
            date.and_time(self.end)
        };
        (start, end)
    }

    /// True when the slot lies fully inside this window on the slot's own date.
    pub fn contains(&self, slot: &TimeSlot) -> bool {
        let (start, end) = self.on(slot.date());
        start <= slot.start && slot.end <= end
    }
}

/// Parses one raw range string. See [`AvailabilityInterval::parse`].
pub fn parse_range(raw: &str) -> Option<AvailabilityInterval> {
    AvailabilityInterval::parse(raw)
}

/// What the availability source said about a department.
///
/// Absence of data means "no constraint"; it never means "no slots".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityInput {
    NoConstraint,
    Intervals(Vec<AvailabilityInterval>),
    /// The source could not be read. Filtering treats this like [`Self::NoConstraint`].
    SourceError(String),
}

impl AvailabilityInput {
    /// Parses raw ranges, dropping malformed ones. If nothing parses, there is no constraint.
    pub fn from_raw<S: AsRef<str>>(raw: &[S]) -> Self {
        let intervals: Vec<AvailabilityInterval> = raw
            .iter()
            .map(AsRef::as_ref)
            .filter(|r| !r.trim().is_empty())
            .filter_map(|r| {
                let parsed = parse_range(r);
                if parsed.is_none() {
                    debug!("Skipping malformed availability range {:?}", r);
                }
                parsed
            })
            .collect();

        if intervals.is_empty() {
            Self::NoConstraint
        } else {
            Self::Intervals(intervals)
        }
    }

    pub fn from_source<E: fmt::Display>(result: Result<Vec<String>, E>) -> Self {
        match result {
            Ok(raw) => Self::from_raw(&raw),
            Err(e) => Self::SourceError(e.to_string()),
        }
    }

    /// The parsed windows, or `None` when every slot is allowed.
    pub fn intervals(&self) -> Option<&[AvailabilityInterval]> {
        match self {
            Self::Intervals(intervals) => Some(intervals),
            Self::NoConstraint | Self::SourceError(_) => None,
        }
    }

    pub fn is_constrained(&self) -> bool {
        self.intervals().is_some()
    }
}

/// Keeps the slots that fit entirely inside at least one window, preserving order.
pub fn filter_slots(slots: Vec<TimeSlot>, input: &AvailabilityInput) -> Vec<TimeSlot> {
    match input.intervals() {
        None => slots,
        Some(intervals) => slots
            .into_iter()
            .filter(|slot| intervals.iter().any(|i| i.contains(slot)))
            .collect(),
    }
}

/// Reads and parses a department's availability.
///
/// Without a store there is no constraint. Store failures are logged and surface as
/// [`AvailabilityInput::SourceError`] so the caller still gets the full grid.
pub async fn load_availability(
    store: Option<&dyn AvailabilityStore<Error = BoxedError>>,
    department: &str,
) -> AvailabilityInput {
    let Some(store) = store else {
        debug!("No availability store configured; {} is unconstrained", department);
        return AvailabilityInput::NoConstraint;
    };

    let input = AvailabilityInput::from_source(store.get_intervals(department).await);
    if let AvailabilityInput::SourceError(reason) = &input {
        warn!(
            "Availability for {} could not be read, showing all slots: {}",
            department, reason
        );
    }
    input
}
