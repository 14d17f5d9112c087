mod common;
use chrono::{TimeZone, Utc};
use common::dec;
use rteamline::db::initialize::init_db;
use rteamline::db::log::{load_log, ttlog};
use rteamline::db::migrate::{column_exists, run_pending_migrations, table_exists};
use rteamline::db::pool::DbPool;
use rteamline::db::queries::{LoadCounts, count_rows, replace_staging};
use rteamline::models::customer::{CleanFrequency, Customer};
use rteamline::models::job::{Job, JobStatus, TimeEntry};
use rteamline::models::period::MembershipInterval;
use rust_decimal::Decimal;

fn fixtures() -> (Vec<Customer>, Vec<Job>, Vec<TimeEntry>, Vec<MembershipInterval>) {
    let created = Utc.with_ymd_and_hms(2024, 12, 4, 22, 0, 0).unwrap();
    let customers = vec![Customer {
        id: 1,
        name: "Smith".into(),
        address: "1 High St".into(),
        phone: "0412000111".into(),
        price: Decimal::from(120),
        clean_frequency: CleanFrequency::Weekly,
        active: true,
        created_at: created,
    }];
    let jobs = vec![Job {
        id: 1,
        customer_id: 1,
        customer_name: "Smith".into(),
        team_id: 1,
        status: JobStatus::Completed,
        created_at: created,
        price: Decimal::from(120),
        team_members_at_creation: vec!["Ann Lee".into(), "Bo Chan".into()],
        additional_staff: vec!["Casey Diaz".into()],
    }];
    let entries = ["Ann Lee", "Bo Chan", "Casey Diaz"]
        .iter()
        .enumerate()
        .map(|(i, name)| TimeEntry {
            id: i as i64 + 1,
            user_id: None,
            staff: name.to_string(),
            job_id: 1,
            clock_in_time: created,
            clock_out_time: None,
        })
        .collect();
    let memberships = vec![MembershipInterval {
        team_id: 1,
        name: "Ann Lee".into(),
        original_team: "Ann Lee & Bo Chan".into(),
        start: dec(1),
        end: dec(31),
    }];
    (customers, jobs, entries, memberships)
}

#[test]
fn test_init_creates_staging_tables() {
    let pool = DbPool::in_memory().expect("db");
    init_db(&pool.conn).expect("init");

    for table in ["log", "customers", "jobs", "time_entries", "team_memberships"] {
        assert!(table_exists(&pool.conn, table).unwrap(), "missing table {table}");
    }
}

#[test]
fn test_old_jobs_table_gets_snapshot_columns() {
    let pool = DbPool::in_memory().expect("db");
    pool.conn
        .execute_batch(
            "CREATE TABLE jobs (
                id INTEGER PRIMARY KEY,
                customer_id INTEGER NOT NULL,
                team_id INTEGER NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                price TEXT NOT NULL DEFAULT '0'
            );",
        )
        .unwrap();

    run_pending_migrations(&pool.conn).expect("migrate");
    // second run is a no-op
    run_pending_migrations(&pool.conn).expect("migrate again");

    assert!(column_exists(&pool.conn, "jobs", "team_members_at_creation").unwrap());
    assert!(column_exists(&pool.conn, "jobs", "additional_staff").unwrap());

    let applied = load_log(&pool.conn)
        .unwrap()
        .into_iter()
        .filter(|r| r.operation == "migration_applied")
        .count();
    assert_eq!(applied, 1);
}

#[test]
fn test_replace_staging_writes_and_replaces() {
    let mut pool = DbPool::in_memory().expect("db");
    init_db(&pool.conn).expect("init");
    let (customers, jobs, entries, memberships) = fixtures();

    let counts = replace_staging(&mut pool, &customers, &jobs, &entries, &memberships).expect("load");
    assert_eq!(
        counts,
        LoadCounts {
            customers: 1,
            jobs: 1,
            time_entries: 3,
            memberships: 1,
        }
    );

    // a second load replaces rather than appends
    replace_staging(&mut pool, &customers, &jobs, &entries[..1], &[]).expect("reload");
    assert_eq!(count_rows(&pool.conn, "time_entries").unwrap(), 1);
    assert_eq!(count_rows(&pool.conn, "team_memberships").unwrap(), 0);
    assert_eq!(count_rows(&pool.conn, "customers").unwrap(), 1);

    let (members, created): (String, String) = pool
        .conn
        .query_row(
            "SELECT team_members_at_creation, created_at FROM jobs WHERE id = 1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(members, r#"["Ann Lee","Bo Chan"]"#);
    assert_eq!(created, "2024-12-04 22:00:00+00");
}

#[test]
fn test_failed_load_keeps_previous_rows() {
    let mut pool = DbPool::in_memory().expect("db");
    init_db(&pool.conn).expect("init");
    let (customers, jobs, entries, memberships) = fixtures();
    replace_staging(&mut pool, &customers, &jobs, &entries, &memberships).expect("load");

    // time entry pointing at a job that is not loaded violates the foreign key
    let mut broken = entries.clone();
    broken[0].job_id = 99;

    assert!(replace_staging(&mut pool, &customers, &jobs, &broken, &memberships).is_err());
    assert_eq!(count_rows(&pool.conn, "time_entries").unwrap(), 3);
    assert_eq!(count_rows(&pool.conn, "team_memberships").unwrap(), 1);
}

#[test]
fn test_log_lines_round_trip_in_order() {
    let pool = DbPool::in_memory().expect("db");
    init_db(&pool.conn).expect("init");

    ttlog(&pool.conn, "teams", "roster.xlsx", "12 periods").unwrap();
    ttlog(&pool.conn, "load", "staging", "3 jobs").unwrap();

    let rows: Vec<_> = load_log(&pool.conn)
        .unwrap()
        .into_iter()
        .filter(|r| r.operation != "migration_applied")
        .collect();
    let ops: Vec<_> = rows.iter().map(|r| r.operation.as_str()).collect();
    assert_eq!(ops, vec!["teams", "load"]);
    assert_eq!(rows[0].target, "roster.xlsx");
}
