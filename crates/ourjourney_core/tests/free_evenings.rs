use chrono::{Days, NaiveDate};
use ourjourney_core::{
    assignment_for_date, next_free_evenings, next_free_evenings_for, Party,
};
use ourjourney_core::schedule::DEFAULT_FREE_EVENING_HORIZON_DAYS;

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

#[test]
fn qualifying_start_date_is_included_with_zero_days_away() {
    let evenings = next_free_evenings(date("2025-08-18"), 1, DEFAULT_FREE_EVENING_HORIZON_DAYS);
    assert_eq!(evenings.len(), 1);
    assert_eq!(evenings[0].date, date("2025-08-18"));
    assert_eq!(evenings[0].days_away, 0);
    assert_eq!(evenings[0].day_name, "Monday");
    assert!(!evenings[0].is_weekend);
}

#[test]
fn non_qualifying_start_date_is_skipped() {
    // The epoch Sunday is yours; Monday is the first free evening.
    let evenings = next_free_evenings(date("2025-08-17"), 2, 60);
    assert_eq!(evenings[0].date, date("2025-08-18"));
    assert_eq!(evenings[0].days_away, 1);
    assert_eq!(evenings[1].date, date("2025-08-19"));
    assert_eq!(evenings[1].days_away, 2);
}

#[test]
fn every_result_is_a_day_without_your_custody() {
    let from = date("2025-12-20");
    let evenings = next_free_evenings(from, 20, 60);
    assert_eq!(evenings.len(), 20);

    for evening in &evenings {
        assert_ne!(assignment_for_date(evening.date).custody_holder, Party::You);
        assert_eq!(from + Days::new(u64::from(evening.days_away)), evening.date);
    }
    for pair in evenings.windows(2) {
        assert!(pair[0].days_away < pair[1].days_away);
    }
}

#[test]
fn weekend_free_evenings_are_flagged() {
    let evenings = next_free_evenings(date("2025-08-17"), 14, 60);
    let saturday = evenings
        .iter()
        .find(|evening| evening.date == date("2025-08-23"))
        .expect("week-one saturday belongs to mom");
    assert!(saturday.is_weekend);
    assert_eq!(saturday.day_name, "Saturday");
}

#[test]
fn short_horizon_returns_short_result() {
    // Sunday and the following Wednesday/Thursday are yours; only Mon/Tue free.
    let evenings = next_free_evenings(date("2025-08-17"), 10, 5);
    let dates = evenings.iter().map(|e| e.date).collect::<Vec<_>>();
    assert_eq!(dates, vec![date("2025-08-18"), date("2025-08-19")]);
}

#[test]
fn horizon_caps_a_fourteen_day_scan_at_seven_free_evenings() {
    let evenings = next_free_evenings(date("2025-08-17"), 100, 14);
    assert_eq!(evenings.len(), 7);
}

#[test]
fn zero_count_or_zero_horizon_yields_nothing() {
    assert!(next_free_evenings(date("2025-08-18"), 0, 60).is_empty());
    assert!(next_free_evenings(date("2025-08-18"), 5, 0).is_empty());
}

#[test]
fn other_side_sees_complementary_evenings() {
    let from = date("2025-08-17");
    let yours = next_free_evenings_for(Party::You, from, 7, 14);
    let moms = next_free_evenings_for(Party::Mom, from, 7, 14);

    assert_eq!(yours.len() + moms.len(), 14);
    for evening in &moms {
        assert!(yours.iter().all(|other| other.date != evening.date));
        assert_eq!(assignment_for_date(evening.date).custody_holder, Party::You);
    }
}

#[test]
fn free_evening_serializes_camel_case() {
    let evening = next_free_evenings(date("2025-08-18"), 1, 60).remove(0);
    let json = serde_json::to_value(evening).unwrap();
    assert_eq!(json["date"], "2025-08-18");
    assert_eq!(json["dayName"], "Monday");
    assert_eq!(json["isWeekend"], false);
    assert_eq!(json["daysAway"], 0);
}
