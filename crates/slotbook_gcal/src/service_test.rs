#[cfg(test)]
mod tests {
    use crate::service::{local_to_utc, to_google_event, GcalServiceError};
    use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
    use chrono_tz::Tz;
    use slotbook_common::services::CalendarEvent;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn event(start: NaiveDateTime, end: NaiveDateTime, zone: &str) -> CalendarEvent {
        CalendarEvent {
            summary: "SBI Tech Interview - Jane Doe".to_string(),
            description: Some("Candidate: Jane Doe".to_string()),
            location: Some("McCombs School of Business".to_string()),
            start,
            end,
            time_zone: zone.to_string(),
        }
    }

    #[test]
    fn test_local_to_utc_standard_and_daylight() {
        let winter = local_to_utc(local(2025, 1, 15, 10, 0), Tz::America__Chicago).unwrap();
        assert_eq!(winter, Utc.with_ymd_and_hms(2025, 1, 15, 16, 0, 0).unwrap());

        let summer = local_to_utc(local(2025, 7, 15, 10, 0), Tz::America__Chicago).unwrap();
        assert_eq!(summer, Utc.with_ymd_and_hms(2025, 7, 15, 15, 0, 0).unwrap());
    }

    #[test]
    fn test_local_to_utc_rejects_spring_forward_gap() {
        let result = local_to_utc(local(2025, 3, 9, 2, 30), Tz::America__Chicago);
        assert!(matches!(result, Err(GcalServiceError::NonexistentLocalTime(_, _))));
    }

    #[test]
    fn test_to_google_event_sets_fields() {
        let api_event = to_google_event(event(
            local(2025, 1, 15, 10, 0),
            local(2025, 1, 15, 10, 30),
            "America/Chicago",
        ))
        .unwrap();

        assert_eq!(api_event.summary.as_deref(), Some("SBI Tech Interview - Jane Doe"));
        assert_eq!(api_event.location.as_deref(), Some("McCombs School of Business"));

        let start = api_event.start.unwrap();
        assert_eq!(start.time_zone.as_deref(), Some("America/Chicago"));
        assert_eq!(
            start.date_time,
            Some(Utc.with_ymd_and_hms(2025, 1, 15, 16, 0, 0).unwrap())
        );
        assert_eq!(
            api_event.end.unwrap().date_time,
            Some(Utc.with_ymd_and_hms(2025, 1, 15, 16, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_to_google_event_unknown_zone() {
        let result = to_google_event(event(
            local(2025, 1, 15, 10, 0),
            local(2025, 1, 15, 10, 30),
            "Central",
        ));
        assert!(matches!(result, Err(GcalServiceError::UnknownTimeZone(_))));
    }

    #[test]
    fn test_to_google_event_inverted_range() {
        let result = to_google_event(event(
            local(2025, 1, 15, 10, 30),
            local(2025, 1, 15, 10, 0),
            "America/Chicago",
        ));
        assert!(matches!(result, Err(GcalServiceError::InvalidRange)));
    }
}
