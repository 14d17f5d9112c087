mod common;
use chrono::{DateTime, Utc};
use common::wages_row;
use rteamline::core::extract::{ColumnLayout, extract_attendance};
use rteamline::core::jobs::{JobBatch, JobBuilder, JobPolicy};
use rteamline::models::job::UNKNOWN_CUSTOMER_ID;
use rteamline::models::observation::Attendance;
use rteamline::models::run_summary::SheetReport;
use rteamline::source::reference::{CustomerReference, ReferenceData, StaffDirectory};
use rteamline::source::SourceRow;
use rust_decimal::Decimal;

fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).expect("rfc3339").with_timezone(&Utc)
}

fn attendance(rows: &[SourceRow]) -> Vec<Attendance> {
    rows.iter()
        .map(|r| extract_attendance(r, &ColumnLayout::default()).expect("valid row"))
        .collect()
}

fn refs() -> ReferenceData {
    ReferenceData {
        staff: StaffDirectory::from_entries([("Ann Lee", 11), ("Bo Chan", 12), ("Casey Diaz", 13)]),
        customers: CustomerReference::from_entries([("Smith", 501), ("Jones", 502)]),
        ..Default::default()
    }
}

fn build(rows: &[SourceRow]) -> (JobBatch, SheetReport) {
    let policy = JobPolicy::default();
    let refs = refs();
    let mut report = SheetReport::new("Week 1");
    let mut builder = JobBuilder::new(&policy, &refs);
    builder.add_sheet(&attendance(rows), &mut report);
    (builder.finish(), report)
}

#[test]
fn test_rows_group_by_date_and_customer() {
    let rows = [
        wages_row(2, "05/12/2024", "Ann Lee & Bo Chan", "Smith", "08:00", "12:00", "No", "150", "1"),
        wages_row(3, "05/12/2024", "Casey Diaz", "Smith", "08:00", "12:00", "No", "", ""),
        wages_row(4, "05/12/2024", "Ann Lee & Bo Chan", "Jones", "13:00", "15:00", "No", "90", "1"),
        wages_row(5, "06/12/2024", "Ann Lee & Bo Chan", "Smith", "08:00", "12:00", "No", "150", "1"),
    ];

    let (batch, report) = build(&rows);

    assert_eq!(batch.jobs.len(), 3);
    assert_eq!(report.dropped_groups, 0);

    let first = &batch.jobs[0];
    assert_eq!(first.customer_id, 501);
    assert_eq!(first.team_id, 1);
    assert_eq!(first.price, Decimal::from(150));
    assert_eq!(first.team_members_at_creation, vec!["Ann Lee", "Bo Chan"]);
    assert_eq!(first.additional_staff, vec!["Casey Diaz"]);

    let staff_on_first: Vec<_> = batch
        .time_entries
        .iter()
        .filter(|e| e.job_id == first.id)
        .map(|e| (e.staff.as_str(), e.user_id))
        .collect();
    assert_eq!(
        staff_on_first,
        vec![("Ann Lee", Some(11)), ("Bo Chan", Some(12)), ("Casey Diaz", Some(13))]
    );
    assert_eq!(batch.time_entries.len(), 7);
}

#[test]
fn test_local_times_shift_to_utc() {
    let rows = [wages_row(2, "05/12/2024", "Ann Lee", "Smith", "08:30", "12:00", "No", "", "1")];

    let (batch, _) = build(&rows);

    let job = &batch.jobs[0];
    assert_eq!(job.created_at, utc("2024-12-04T22:30:00Z"));
    assert_eq!(batch.time_entries[0].clock_in_time, utc("2024-12-04T22:30:00Z"));
    assert_eq!(batch.time_entries[0].clock_out_time, Some(utc("2024-12-05T02:00:00Z")));
    assert_eq!(job.price, Decimal::ZERO);
}

#[test]
fn test_lunch_flag_drives_clock_out() {
    let rows = [
        wages_row(2, "05/12/2024", "Ann Lee", "Smith", "08:00", "12:00", "Yes", "", "1"),
        wages_row(3, "05/12/2024", "Ann Lee", "Jones", "13:00", "15:00", "", "", "1"),
    ];

    let (batch, _) = build(&rows);

    let by_job = |id: i64| {
        batch
            .time_entries
            .iter()
            .find(|e| e.job_id == id)
            .expect("entry for job")
            .clock_out_time
    };
    // 12:00 local minus the 30 minute break
    assert_eq!(by_job(batch.jobs[0].id), Some(utc("2024-12-05T01:30:00Z")));
    assert_eq!(by_job(batch.jobs[1].id), None);
}

#[test]
fn test_finish_before_start_leaves_clock_out_empty() {
    let rows = [wages_row(2, "05/12/2024", "Ann Lee", "Smith", "14:00", "09:00", "No", "", "1")];

    let (batch, _) = build(&rows);

    assert_eq!(batch.time_entries[0].clock_out_time, None);
}

#[test]
fn test_missing_finish_is_counted_apart_from_early_finish() {
    let rows = [
        wages_row(2, "05/12/2024", "Ann Lee", "Smith", "08:00", "", "No", "", "1"),
        wages_row(3, "05/12/2024", "Bo Chan", "Jones", "14:00", "09:00", "Yes", "", "1"),
    ];

    let (batch, report) = build(&rows);

    assert_eq!(batch.jobs.len(), 2);
    assert!(batch.time_entries.iter().all(|e| e.clock_out_time.is_none()));
    assert_eq!(report.missing_finish, 1);
}

#[test]
fn test_label_without_names_drops_the_group() {
    let rows = [
        wages_row(2, "05/12/2024", " & ", "Smith", "08:00", "12:00", "No", "120", "1"),
        wages_row(3, "05/12/2024", "Ann Lee", "Jones", "08:00", "12:00", "No", "", "1"),
    ];

    let (batch, report) = build(&rows);

    assert_eq!(report.dropped_groups, 1);
    assert_eq!(batch.jobs.len(), 1);
    assert_eq!(batch.jobs[0].customer_name, "Jones");
    assert_eq!(batch.time_entries.len(), 1);
    assert!(batch.jobs.iter().all(|j| !j.team_members_at_creation.is_empty()));
}

#[test]
fn test_groups_without_team_id_are_dropped() {
    let rows = [
        wages_row(2, "05/12/2024", "Casey Diaz", "Smith", "08:00", "12:00", "No", "", ""),
        wages_row(3, "05/12/2024", "Ann Lee", "Jones", "08:00", "12:00", "No", "", "1"),
    ];

    let (batch, report) = build(&rows);

    assert_eq!(report.dropped_groups, 1);
    assert_eq!(batch.jobs.len(), 1);
    assert_eq!(batch.jobs[0].customer_name, "Jones");
    assert!(batch.time_entries.iter().all(|e| e.staff != "Casey Diaz"));
}

#[test]
fn test_unknown_names_are_collected() {
    let rows = [
        wages_row(2, "05/12/2024", "Ann Lee & Dana Fox", "Brown", "08:00", "12:00", "No", "", "3"),
        wages_row(3, "06/12/2024", "Dana Fox", "Brown", "08:00", "12:00", "No", "", "3"),
    ];

    let (batch, _) = build(&rows);

    assert!(batch.jobs.iter().all(|j| j.customer_id == UNKNOWN_CUSTOMER_ID));
    assert_eq!(batch.unresolved_customers.iter().collect::<Vec<_>>(), vec!["Brown"]);
    assert_eq!(batch.unresolved_staff.iter().collect::<Vec<_>>(), vec!["Dana Fox"]);

    let dana: Vec<_> = batch
        .time_entries
        .iter()
        .filter(|e| e.staff == "Dana Fox")
        .collect();
    assert_eq!(dana.len(), 2);
    assert!(dana.iter().all(|e| e.user_id.is_none()));
}

#[test]
fn test_first_row_fixes_visit_details() {
    let rows = [
        wages_row(2, "05/12/2024", "Ann Lee", "Smith", "08:00", "12:00", "No", "200", "1"),
        wages_row(3, "05/12/2024", "Bo Chan", "Smith", "10:00", "16:00", "Yes", "999", "2"),
    ];

    let (batch, _) = build(&rows);

    assert_eq!(batch.jobs.len(), 1);
    let job = &batch.jobs[0];
    assert_eq!(job.price, Decimal::from(200));
    assert_eq!(job.created_at, utc("2024-12-04T22:00:00Z"));
    // last core member's team id wins
    assert_eq!(job.team_id, 2);
    assert_eq!(job.team_members_at_creation, vec!["Ann Lee", "Bo Chan"]);
}

#[test]
fn test_custom_offset() {
    let policy = JobPolicy {
        utc_offset_hours: 0,
        lunch_break_minutes: 45,
        ..JobPolicy::default()
    };
    let refs = refs();
    let mut report = SheetReport::new("Week 1");
    let mut builder = JobBuilder::new(&policy, &refs);
    let rows = [wages_row(2, "05/12/2024", "Ann Lee", "Smith", "08:00", "12:00", "Yes", "", "1")];
    builder.add_sheet(&attendance(&rows), &mut report);

    let batch = builder.finish();

    assert_eq!(batch.time_entries[0].clock_in_time, utc("2024-12-05T08:00:00Z"));
    assert_eq!(batch.time_entries[0].clock_out_time, Some(utc("2024-12-05T11:15:00Z")));
}
