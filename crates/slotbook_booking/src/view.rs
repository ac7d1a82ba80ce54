// --- File: crates/slotbook_booking/src/view.rs ---
use crate::availability::{filter_slots, load_availability};
use crate::settings::BookingSettings;
use crate::slots::TimeSlot;
use chrono::NaiveDate;
use serde::Serialize;
use slotbook_common::services::{AvailabilityStore, BoxedError};
use tracing::{debug, info};

/// Slots a candidate may pick for one date and department.
///
/// Built fresh for every request so it always reflects the store's current contents.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SlotAvailabilityView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2025-01-15"))]
    pub date: NaiveDate,
    /// Earliest date the date picker should offer.
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2025-01-11"))]
    pub min_date: NaiveDate,
    /// False when the department has no usable availability and the full grid is shown.
    pub constrained: bool,
    pub slots: Vec<TimeSlot>,
}

/// Candidate identity carried through slot selection unchanged.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Grid generation followed by availability filtering.
pub async fn resolve_slots(
    settings: &BookingSettings,
    store: Option<&dyn AvailabilityStore<Error = BoxedError>>,
    department: &str,
    date: NaiveDate,
) -> (Vec<TimeSlot>, bool) {
    let grid = settings.grid.slots_for(date);
    let input = load_availability(store, department).await;
    let total = grid.len();
    let slots = filter_slots(grid, &input);

    debug!("{} of {} slots kept for {} on {}", slots.len(), total, department, date);
    (slots, input.is_constrained())
}

pub async fn build_view(
    settings: &BookingSettings,
    store: Option<&dyn AvailabilityStore<Error = BoxedError>>,
    candidate: Candidate,
    department: String,
    date: NaiveDate,
) -> SlotAvailabilityView {
    let (slots, constrained) = resolve_slots(settings, store, &department, date).await;
    info!("Serving {} slots for {} on {}", slots.len(), department, date);

    SlotAvailabilityView {
        id: candidate.id,
        name: candidate.name,
        email: candidate.email,
        department,
        date,
        min_date: settings.earliest_date(),
        constrained,
        slots,
    }
}
