#[cfg(test)]
mod tests {
    use crate::availability::{filter_slots, AvailabilityInput};
    use crate::slots::generate_time_slots;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (1900i32..2200, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn clock_token(hour24: u32) -> String {
        let (hour, suffix) = match hour24 {
            0 => (12, "AM"),
            1..=11 => (hour24, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        format!("{}{}", hour, suffix)
    }

    proptest! {
        // Grid shape holds for every date
        #[test]
        fn test_grid_is_contiguous_and_ordered(date in any_date()) {
            let slots = generate_time_slots(date);
            prop_assert_eq!(slots.len(), 24);

            for slot in &slots {
                prop_assert_eq!(slot.end - slot.start, Duration::minutes(30));
                prop_assert_eq!(slot.date(), date);
            }
            for pair in slots.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
        }

        // Every kept slot lies inside the window, and every dropped slot does not
        #[test]
        fn test_filter_respects_window(
            date in any_date(),
            start_hour in 1u32..22,
            len_hours in 1u32..6,
        ) {
            let end_hour = (start_hour + len_hours).min(23);
            let range = format!("{}-{}", clock_token(start_hour), clock_token(end_hour));
            let input = AvailabilityInput::from_raw(&[range]);
            let grid = generate_time_slots(date);
            let kept = filter_slots(grid.clone(), &input);

            let window_start = date.and_hms_opt(start_hour, 0, 0).unwrap();
            let window_end = date.and_hms_opt(end_hour, 0, 0).unwrap();
            for slot in &grid {
                let inside = window_start <= slot.start && slot.end <= window_end;
                prop_assert_eq!(kept.contains(slot), inside);
            }
        }

        // Filtering never reorders or invents slots
        #[test]
        fn test_filter_is_order_preserving_subset(
            date in any_date(),
            ranges in proptest::collection::vec("[0-9]{1,2}(AM|PM)-[0-9]{1,2}(AM|PM)", 0..4),
        ) {
            let grid = generate_time_slots(date);
            let kept = filter_slots(grid.clone(), &AvailabilityInput::from_raw(&ranges));
            let mut cursor = grid.iter();
            for slot in &kept {
                prop_assert!(cursor.any(|g| g == slot));
            }
        }
    }
}
