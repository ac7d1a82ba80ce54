// --- File: crates/slotbook_booking/src/settings.rs ---
use crate::slots::SlotGrid;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use slotbook_config::BookingConfig;
use std::str::FromStr;
use tracing::warn;

/// Runtime view of [`BookingConfig`] with times and zone already parsed.
#[derive(Debug, Clone)]
pub struct BookingSettings {
    pub grid: SlotGrid,
    pub time_zone: Tz,
    pub reminder: Duration,
    pub selection_path: String,
    pub organization: String,
    pub organization_name: String,
    pub uid_domain: String,
    pub product_id: String,
    pub location_note: Option<String>,
}

impl BookingSettings {
    /// Unparseable values fall back to the defaults with a warning rather than failing startup.
    pub fn from_config(config: &BookingConfig) -> Self {
        let defaults = SlotGrid::default();

        let day_start = parse_clock(&config.day_start).unwrap_or_else(|| {
            warn!("Invalid booking.day_start {:?}, using {}", config.day_start, defaults.day_start);
            defaults.day_start
        });
        let day_end = parse_clock(&config.day_end).unwrap_or_else(|| {
            warn!("Invalid booking.day_end {:?}, using {}", config.day_end, defaults.day_end);
            defaults.day_end
        });
        let step = if config.slot_minutes > 0 {
            Duration::minutes(config.slot_minutes)
        } else {
            warn!("booking.slot_minutes must be positive, using {}", defaults.step.num_minutes());
            defaults.step
        };

        let time_zone = Tz::from_str(&config.time_zone).unwrap_or_else(|_| {
            warn!("Unknown booking.time_zone {:?}, using America/Chicago", config.time_zone);
            Tz::America__Chicago
        });

        Self {
            grid: SlotGrid {
                day_start,
                day_end,
                step,
            },
            time_zone,
            reminder: Duration::minutes(config.reminder_minutes.max(0)),
            selection_path: config.selection_path.clone(),
            organization: config.organization.clone(),
            organization_name: config.organization_name.clone(),
            uid_domain: config.uid_domain.clone(),
            product_id: config.product_id.clone(),
            location_note: config.location_note.clone(),
        }
    }

    /// The first bookable date: tomorrow in the configured zone.
    pub fn earliest_date(&self) -> NaiveDate {
        let today = Utc::now().with_timezone(&self.time_zone).date_naive();
        today.succ_opt().unwrap_or(today)
    }

    /// Zone abbreviation in effect at a civil time, e.g. "CST" or "CDT".
    pub fn zone_abbreviation(&self, at: chrono::NaiveDateTime) -> String {
        use chrono::TimeZone;
        self.time_zone
            .from_local_datetime(&at)
            .earliest()
            .map(|dt| dt.format("%Z").to_string())
            .unwrap_or_else(|| self.time_zone.name().to_string())
    }
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self::from_config(&BookingConfig::default())
    }
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}
