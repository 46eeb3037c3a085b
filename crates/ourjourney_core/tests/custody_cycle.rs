use chrono::{Datelike, Days, NaiveDate};
use ourjourney_core::{
    assignment_for_date, assignments_for_month, assignments_for_range, cycle_epoch,
    DayAssignment, Party, ScheduleError,
};

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

fn same_schedule(left: &DayAssignment, right: &DayAssignment) -> bool {
    left.custody_holder == right.custody_holder
        && left.cycle_position == right.cycle_position
        && left.is_overnight_boundary == right.is_overnight_boundary
        && left.is_transition_day == right.is_transition_day
        && left.dropoff == right.dropoff
        && left.pickup == right.pickup
        && left.handoff_from == right.handoff_from
        && left.handoff_to == right.handoff_to
}

#[test]
fn epoch_sunday_belongs_to_you_overnight() {
    let assignment = assignment_for_date(date("2025-08-17"));
    assert_eq!(cycle_epoch(), date("2025-08-17"));
    assert_eq!(assignment.custody_holder, Party::You);
    assert!(assignment.is_overnight_boundary);
    assert!(assignment.is_weekend);
    assert!(!assignment.is_transition_day);
    assert_eq!(assignment.week_in_cycle, 1);
    assert_eq!(assignment.day_of_week, 0);
    assert_eq!(assignment.dropoff, None);
    assert_eq!(assignment.pickup, None);
}

#[test]
fn first_monday_hands_off_from_you_to_mom() {
    let assignment = assignment_for_date(date("2025-08-18"));
    assert_eq!(assignment.custody_holder, Party::Mom);
    assert!(assignment.is_transition_day);
    assert_eq!(assignment.handoff_from, Some(Party::You));
    assert_eq!(assignment.handoff_to, Some(Party::Mom));
    assert!(!assignment.is_overnight_boundary);
    assert!(!assignment.is_weekend);
}

#[test]
fn tuesday_with_same_party_exchange_is_not_a_transition() {
    let assignment = assignment_for_date(date("2025-08-19"));
    assert_eq!(assignment.custody_holder, Party::Mom);
    assert_eq!(assignment.dropoff, Some(Party::Mom));
    assert_eq!(assignment.pickup, Some(Party::Mom));
    assert!(!assignment.is_transition_day);
    assert_eq!(assignment.handoff_from, None);
    assert_eq!(assignment.handoff_to, None);
}

#[test]
fn one_cycle_later_and_earlier_match_the_epoch() {
    let epoch = assignment_for_date(date("2025-08-17"));
    let later = assignment_for_date(date("2025-08-31"));
    let earlier = assignment_for_date(date("2025-08-03"));

    assert!(same_schedule(&epoch, &later));
    assert!(same_schedule(&epoch, &earlier));
    assert_eq!(earlier.custody_holder, Party::You);
}

#[test]
fn day_before_epoch_is_last_position_of_week_two() {
    let assignment = assignment_for_date(date("2025-08-16"));
    assert_eq!(assignment.cycle_position, 13);
    assert_eq!(assignment.week_in_cycle, 2);
    assert_eq!(assignment.custody_holder, Party::You);
    assert!(assignment.is_overnight_boundary);
}

#[test]
fn schedule_repeats_every_fourteen_days() {
    let mut current = date("1999-11-20");
    let end = date("2031-03-01");
    while current <= end {
        let here = assignment_for_date(current);
        let next_cycle = assignment_for_date(current + Days::new(14));
        assert!(same_schedule(&here, &next_cycle), "period broken at {current}");
        current = current + Days::new(1);
    }
}

#[test]
fn custody_inverts_after_seven_days() {
    let mut current = date("2024-12-01");
    let end = date("2026-02-01");
    while current <= end {
        let here = assignment_for_date(current);
        let next_week = assignment_for_date(current + Days::new(7));
        assert_ne!(here.custody_holder, next_week.custody_holder, "at {current}");
        assert_eq!(here.day_position, next_week.day_position);
        current = current + Days::new(1);
    }
}

#[test]
fn overnight_boundaries_fall_only_on_weekends() {
    let assignments = assignments_for_range(date("1987-06-01"), date("1987-08-31")).unwrap();
    for assignment in &assignments {
        if assignment.is_overnight_boundary {
            assert!(assignment.is_weekend, "{}", assignment.date);
        }
        assert_eq!(
            assignment.day_of_week as u32,
            assignment.date.weekday().num_days_from_sunday()
        );
    }
    assert!(assignments.iter().any(|a| a.is_overnight_boundary));
}

#[test]
fn range_is_complete_and_strictly_ascending() {
    let start = date("2025-07-28");
    let end = date("2026-01-05");
    let assignments = assignments_for_range(start, end).unwrap();

    let expected_len = (end - start).num_days() as usize + 1;
    assert_eq!(assignments.len(), expected_len);
    assert_eq!(assignments.first().unwrap().date, start);
    assert_eq!(assignments.last().unwrap().date, end);
    for pair in assignments.windows(2) {
        assert_eq!(pair[0].date + Days::new(1), pair[1].date);
    }
}

#[test]
fn single_day_range_returns_one_assignment() {
    let day = date("2025-08-20");
    let assignments = assignments_for_range(day, day).unwrap();
    assert_eq!(assignments, vec![assignment_for_date(day)]);
}

#[test]
fn reversed_range_is_rejected_not_swapped() {
    let start = date("2025-09-10");
    let end = date("2025-09-01");
    let err = assignments_for_range(start, end).unwrap_err();
    assert_eq!(err, ScheduleError::InvalidRange { start, end });
    assert_eq!(err.kind(), "invalid_range");
}

#[test]
fn february_length_follows_leap_years() {
    assert_eq!(assignments_for_month(2024, 2).unwrap().len(), 29);
    assert_eq!(assignments_for_month(2025, 2).unwrap().len(), 28);
    assert_eq!(assignments_for_month(2000, 2).unwrap().len(), 29);
    assert_eq!(assignments_for_month(1900, 2).unwrap().len(), 28);
}

#[test]
fn month_covers_first_through_last_day() {
    let august = assignments_for_month(2025, 8).unwrap();
    assert_eq!(august.len(), 31);
    assert_eq!(august.first().unwrap().date, date("2025-08-01"));
    assert_eq!(august.last().unwrap().date, date("2025-08-31"));

    let december = assignments_for_month(2025, 12).unwrap();
    assert_eq!(december.last().unwrap().date, date("2025-12-31"));

    let april = assignments_for_month(2026, 4).unwrap();
    assert_eq!(april.len(), 30);
}

#[test]
fn month_out_of_range_is_invalid_date() {
    for month in [0, 13] {
        let err = assignments_for_month(2025, month).unwrap_err();
        assert_eq!(err.kind(), "invalid_date");
    }
}

#[test]
fn assignment_serializes_with_iso_date_and_camel_case_fields() {
    let json = serde_json::to_value(assignment_for_date(date("2025-08-18"))).unwrap();
    assert_eq!(json["date"], "2025-08-18");
    assert_eq!(json["custodyHolder"], "mom");
    assert_eq!(json["handoffFrom"], "you");
    assert_eq!(json["handoffTo"], "mom");
    assert_eq!(json["isTransitionDay"], true);
    assert_eq!(json["isOvernightBoundary"], false);
    assert_eq!(json["weekInCycle"], 1);
    assert_eq!(json["dayOfWeek"], 1);
}
