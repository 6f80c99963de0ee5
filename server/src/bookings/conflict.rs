//! Schedule conflict scan
//!
//! Intervals are half-open `[start, start + duration)` in minutes from
//! midnight, so back-to-back bookings never conflict. The scan is
//! advisory: it is surfaced to the admin console before a confirm but
//! never blocks one.

use crate::db::models::Booking;
use chrono::{NaiveTime, Timelike};

/// Minutes from midnight
fn minutes_of(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

/// Half-open interval overlap
pub fn overlaps(start_a: i64, duration_a: i64, start_b: i64, duration_b: i64) -> bool {
    start_a < start_b + duration_b && start_b < start_a + duration_a
}

/// First booking whose interval overlaps the candidate slot
///
/// `exclude` skips the booking being edited so it never conflicts with
/// itself. Callers pass bookings already filtered to the interpreter,
/// the date, and CONFIRMED status.
pub fn find_conflict<'a>(
    bookings: &'a [Booking],
    start_time: NaiveTime,
    duration_minutes: i64,
    exclude: Option<&str>,
) -> Option<&'a Booking> {
    let start = minutes_of(start_time);
    bookings.iter().find(|b| {
        let excluded = match (exclude, &b.id) {
            (Some(skip), Some(id)) => id.to_string() == skip,
            _ => false,
        };
        !excluded && overlaps(start, duration_minutes, minutes_of(b.start_time), b.duration_minutes)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{BookingStatus, Location, ServiceType};
    use chrono::NaiveDate;
    use surrealdb::RecordId;

    fn booking(id: &str, start: &str, duration_minutes: i64) -> Booking {
        Booking {
            id: Some(RecordId::from_table_key("booking", id)),
            client: RecordId::from_table_key("client", "c1"),
            language_from: "en".to_string(),
            language_to: "es".to_string(),
            service_type: ServiceType::Onsite,
            date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            start_time: start.parse().unwrap(),
            duration_minutes,
            location: Location::Onsite {
                address: "1 Main St".to_string(),
            },
            status: BookingStatus::Confirmed,
            interpreter: Some(RecordId::from_table_key("interpreter", "i1")),
            version: 1,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_overlapping_slots_conflict() {
        // 10:00-11:00 vs candidate 10:30-11:30
        let existing = [booking("b1", "10:00:00", 60)];
        let hit = find_conflict(&existing, "10:30:00".parse().unwrap(), 60, None);
        assert!(hit.is_some());
    }

    #[test]
    fn test_adjacent_slots_do_not_conflict() {
        // 10:00-11:00 vs candidate 11:00-12:00
        let existing = [booking("b1", "10:00:00", 60)];
        let hit = find_conflict(&existing, "11:00:00".parse().unwrap(), 60, None);
        assert!(hit.is_none());
    }

    #[test]
    fn test_containment_conflicts() {
        // 09:00-12:00 swallows candidate 10:00-10:30
        let existing = [booking("b1", "09:00:00", 180)];
        let hit = find_conflict(&existing, "10:00:00".parse().unwrap(), 30, None);
        assert!(hit.is_some());
    }

    #[test]
    fn test_excluded_booking_never_conflicts_with_itself() {
        let existing = [booking("b1", "10:00:00", 60)];
        let hit = find_conflict(
            &existing,
            "10:00:00".parse().unwrap(),
            60,
            Some("booking:b1"),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_first_overlap_wins() {
        let existing = [
            booking("b1", "08:00:00", 60),
            booking("b2", "10:00:00", 60),
            booking("b3", "10:30:00", 60),
        ];
        let hit = find_conflict(&existing, "10:45:00".parse().unwrap(), 30, None);
        assert_eq!(
            hit.and_then(|b| b.id.as_ref()).map(|id| id.to_string()),
            Some("booking:b2".to_string())
        );
    }

    #[test]
    fn test_touching_end_does_not_conflict() {
        // candidate 09:00-10:00 ends exactly where the existing one starts
        let existing = [booking("b1", "10:00:00", 60)];
        let hit = find_conflict(&existing, "09:00:00".parse().unwrap(), 60, None);
        assert!(hit.is_none());
    }
}
