mod common;
use chrono::{NaiveDateTime, NaiveTime};
use common::{d, dec, text_row, wages_row};
use rteamline::core::dates::{normalize_date, normalize_time, parse_date_str, parse_registration_date};
use rteamline::core::extract::{
    ColumnLayout, SkipReason, extract_attendance, extract_observation, parse_amount, parse_team_id,
};
use rteamline::models::observation::{LunchBreak, Role};
use rteamline::source::{Cell, SourceRow};
use rust_decimal::Decimal;
use std::str::FromStr;

// ---------------------------
// Date normalizer
// ---------------------------

#[test]
fn test_accepted_date_patterns() {
    assert_eq!(parse_date_str("2024-12-05"), Some(dec(5)));
    assert_eq!(parse_date_str("05/12/2024"), Some(dec(5)));
    assert_eq!(parse_date_str("05-12-2024"), Some(dec(5)));
    assert_eq!(parse_date_str("2024-12-05 07:30:00"), Some(dec(5)));
    assert_eq!(parse_date_str(" 05/12/2024 "), Some(dec(5)));
}

#[test]
fn test_unparsable_dates_yield_nothing() {
    assert_eq!(parse_date_str(""), None);
    assert_eq!(parse_date_str("Thursday"), None);
    assert_eq!(parse_date_str("12/31/2024"), None);
    assert_eq!(parse_date_str("05/12/24"), None);
}

#[test]
fn test_native_cells_normalize() {
    let dt = NaiveDateTime::parse_from_str("2024-12-05 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();

    assert_eq!(normalize_date(&Cell::Date(dec(5))), Some(dec(5)));
    assert_eq!(normalize_date(&Cell::DateTime(dt)), Some(dec(5)));
    assert_eq!(normalize_date(&Cell::Float(45631.0)), None);
    assert_eq!(normalize_date(&Cell::Empty), None);
}

#[test]
fn test_times_normalize() {
    let nine = NaiveTime::from_hms_opt(9, 0, 0);

    assert_eq!(normalize_time(&Cell::text_of("09:00")), nine);
    assert_eq!(normalize_time(&Cell::text_of("09:00:00")), nine);
    assert_eq!(normalize_time(&Cell::text_of("9:00 AM")), nine);
    assert_eq!(normalize_time(&Cell::Time(NaiveTime::from_hms_opt(9, 0, 0).unwrap())), nine);
    assert_eq!(normalize_time(&Cell::text_of("morning")), None);
}

#[test]
fn test_registration_dates() {
    assert_eq!(parse_registration_date("6th Sep 24"), Some(d(2024, 9, 6)));
    assert_eq!(parse_registration_date("21st March 2025"), Some(d(2025, 3, 21)));
    assert_eq!(parse_registration_date("25-06-13 04:00:00+00"), Some(d(2025, 6, 13)));
    assert_eq!(parse_registration_date("2025-01-07T04:00:00Z"), Some(d(2025, 1, 7)));
    assert_eq!(parse_registration_date("soon"), None);
}

// ---------------------------
// Team-tracking extractor
// ---------------------------

#[test]
fn test_observation_from_full_row() {
    let row = wages_row(2, "05/12/2024", " A & B ", "Smith", "08:00", "12:00", "No", "120", "1");

    let o = extract_observation(&row, &ColumnLayout::default()).expect("accepted");

    assert_eq!(o.date, dec(5));
    assert_eq!(o.team_id, 1);
    assert_eq!(o.raw_label, "A & B");
    assert_eq!(o.role, Role::CoreMember);
}

#[test]
fn test_observation_label_is_canonical() {
    let layout = ColumnLayout::default();
    let spaced = wages_row(2, "05/12/2024", "A  &  B", "Smith", "", "", "", "", "1");
    let repeated = wages_row(3, "05/12/2024", "A &B & A", "Smith", "", "", "", "", "1");
    let empty = wages_row(4, "05/12/2024", " & ", "Smith", "", "", "", "", "1");

    assert_eq!(extract_observation(&spaced, &layout).expect("accepted").raw_label, "A & B");
    assert_eq!(extract_observation(&repeated, &layout).expect("accepted").raw_label, "A & B");
    assert_eq!(
        extract_observation(&empty, &layout).unwrap_err(),
        SkipReason::MissingTeamLabel
    );
}

#[test]
fn test_short_rows_are_skipped() {
    let row = text_row(2, &["05/12/2024", "A", "Smith"]);

    let err = extract_observation(&row, &ColumnLayout::default()).unwrap_err();

    assert_eq!(err, SkipReason::TooFewColumns { found: 3, required: 13 });
    assert_eq!(err.kind(), "too_few_columns");
}

#[test]
fn test_observation_skip_reasons() {
    let layout = ColumnLayout::default();
    let cases = [
        (wages_row(2, "", "A", "C", "", "", "", "", "1"), "missing_date"),
        (wages_row(3, "someday", "A", "C", "", "", "", "", "1"), "unparsable_date"),
        (wages_row(4, "05/12/2024", "  ", "C", "", "", "", "", "1"), "missing_team_label"),
        (wages_row(5, "05/12/2024", "A", "C", "", "", "", "", ""), "missing_team_id"),
        (wages_row(6, "05/12/2024", "A", "C", "", "", "", "", "=M5"), "formula_team_id"),
        (wages_row(7, "05/12/2024", "A", "C", "", "", "", "", "1.5"), "non_integer_team_id"),
    ];

    for (row, kind) in cases {
        let err = extract_observation(&row, &layout).unwrap_err();
        assert_eq!(err.kind(), kind, "row {}", row.number);
    }
}

#[test]
fn test_team_id_cells() {
    assert_eq!(parse_team_id(&Cell::Int(3)), Ok(3));
    assert_eq!(parse_team_id(&Cell::Float(3.0)), Ok(3));
    assert_eq!(parse_team_id(&Cell::text_of(" 12 ")), Ok(12));
    assert!(parse_team_id(&Cell::Float(3.5)).is_err());
    assert!(parse_team_id(&Cell::text_of("=SUM(A1)")).is_err());
}

#[test]
fn test_custom_layout_moves_columns() {
    let layout = ColumnLayout {
        team_id: 2,
        min_columns: 3,
        ..ColumnLayout::default()
    };
    let row = SourceRow::new(2, vec![Cell::Date(dec(9)), Cell::text_of("Z"), Cell::Int(8)]);

    let o = extract_observation(&row, &layout).expect("accepted");

    assert_eq!((o.team_id, o.raw_label.as_str()), (8, "Z"));
}

// ---------------------------
// Job extractor
// ---------------------------

#[test]
fn test_attendance_classifies_roles() {
    let layout = ColumnLayout::default();
    let core = wages_row(2, "05/12/2024", "A & B", "Smith", "08:00", "12:00", "Yes", "$1,200.50", "4");
    let extra = wages_row(3, "05/12/2024", "Casey", "Smith", "08:00", "12:00", "Yes", "", "");

    let a = extract_attendance(&core, &layout).expect("core row");
    let b = extract_attendance(&extra, &layout).expect("extra row");

    let core_mark = a.staff.expect("core staff");
    assert_eq!(core_mark.role, Role::CoreMember);
    assert_eq!(core_mark.team_id, Some(4));
    assert_eq!(a.lunch, LunchBreak::Taken);
    assert_eq!(a.price, Some(Decimal::from_str("1200.50").unwrap()));

    let extra_mark = b.staff.expect("extra staff");
    assert_eq!(extra_mark.role, Role::AdditionalStaff);
    assert_eq!(extra_mark.team_id, None);
    assert_eq!(b.price, None);
}

#[test]
fn test_attendance_requires_customer_and_start() {
    let layout = ColumnLayout::default();
    let no_customer = wages_row(2, "05/12/2024", "A", "", "08:00", "", "", "", "1");
    let no_start = wages_row(3, "05/12/2024", "A", "Smith", "", "", "", "", "1");

    assert_eq!(
        extract_attendance(&no_customer, &layout).unwrap_err(),
        SkipReason::MissingCustomer
    );
    assert_eq!(
        extract_attendance(&no_start, &layout).unwrap_err(),
        SkipReason::MissingStartTime
    );
}

#[test]
fn test_amounts() {
    assert_eq!(parse_amount("120"), Some(Decimal::from(120)));
    assert_eq!(parse_amount(" $1,050.5 "), Some(Decimal::from_str("1050.5").unwrap()));
    assert_eq!(parse_amount(""), None);
    assert_eq!(parse_amount("n/a"), None);
}
