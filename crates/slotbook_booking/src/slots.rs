// --- File: crates/slotbook_booking/src/slots.rs ---
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Display format for slot labels, e.g. "09:30 AM".
pub const LABEL_FORMAT: &str = "%I:%M %p";

/// One bookable interval in local civil time.
///
/// Two slots are equal when their bounds are equal; the label is presentation only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TimeSlot {
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2025-01-15T10:00:00"))]
    pub start: NaiveDateTime,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2025-01-15T10:30:00"))]
    pub end: NaiveDateTime,
    #[cfg_attr(feature = "openapi", schema(example = "10:00 AM"))]
    pub label: String,
}

impl TimeSlot {
    /// Builds a slot from exact bounds, labelling it by its start.
    pub fn from_bounds(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            label: start.format(LABEL_FORMAT).to_string(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl PartialEq for TimeSlot {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for TimeSlot {}

/// Daily window and granularity of the slot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGrid {
    /// Start of the first slot.
    pub day_start: NaiveTime,
    /// No slot ends after this time.
    pub day_end: NaiveTime,
    pub step: Duration,
}

impl Default for SlotGrid {
    /// 09:00 to 21:00 in 30 minute steps.
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            day_end: NaiveTime::from_hms_opt(21, 0, 0).unwrap_or(NaiveTime::MIN),
            step: Duration::minutes(30),
        }
    }
}

impl SlotGrid {
    /// Chronological, contiguous slots for `date`.
    ///
    /// Pure: the date is not checked against today, so past dates produce a full grid too.
    pub fn slots_for(&self, date: NaiveDate) -> Vec<TimeSlot> {
        if self.step <= Duration::zero() {
            return Vec::new();
        }

        let window_end = date.and_time(self.day_end);
        let mut slots = Vec::new();
        let mut start = date.and_time(self.day_start);

        while let Some(end) = start.checked_add_signed(self.step) {
            if end > window_end {
                break;
            }
            slots.push(TimeSlot::from_bounds(start, end));
            start = end;
        }
        slots
    }
}

/// The canonical grid for `date`: 24 half-hour slots between 09:00 and 21:00.
pub fn generate_time_slots(date: NaiveDate) -> Vec<TimeSlot> {
    SlotGrid::default().slots_for(date)
}
