// --- File: crates/slotbook_booking/src/static_store.rs ---
use slotbook_common::services::{AvailabilityStore, BoxFuture};
use std::collections::HashMap;
use std::convert::Infallible;

/// Availability read from `booking.availability` in configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticAvailabilityStore {
    // keyed by lower-cased department name
    entries: HashMap<String, Vec<String>>,
}

impl StaticAvailabilityStore {
    pub fn new(entries: &HashMap<String, Vec<String>>) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(dept, ranges)| (dept.to_lowercase(), ranges.clone()))
                .collect(),
        }
    }
}

impl AvailabilityStore for StaticAvailabilityStore {
    type Error = Infallible;

    fn get_intervals(&self, department: &str) -> BoxFuture<'_, Vec<String>, Self::Error> {
        let ranges = self
            .entries
            .get(&department.trim().to_lowercase())
            .cloned()
            .unwrap_or_default();
        Box::pin(async move { Ok(ranges) })
    }
}
