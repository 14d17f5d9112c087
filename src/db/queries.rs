//! Staging writes. Each load replaces the previous content of its tables
//! in one transaction, so a failed load leaves the old data in place.

use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::customer::Customer;
use crate::models::job::{Job, TimeEntry};
use crate::models::period::MembershipInterval;
use crate::utils::date::format_dmy;
use crate::utils::time::format_utc;
use rusqlite::{Connection, params};

/// Rows written by one load, per table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadCounts {
    pub customers: usize,
    pub jobs: usize,
    pub time_entries: usize,
    pub memberships: usize,
}

fn insert_customers(conn: &Connection, customers: &[Customer]) -> AppResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO customers (id, name, address, phone, price, clean_frequency, active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;

    for c in customers {
        stmt.execute(params![
            c.id,
            c.name,
            c.address,
            c.phone,
            c.price.to_string(),
            c.clean_frequency.as_str(),
            c.active,
            format_utc(&c.created_at),
        ])?;
    }
    Ok(customers.len())
}

fn insert_jobs(conn: &Connection, jobs: &[Job]) -> AppResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO jobs (id, customer_id, team_id, status, created_at, price,
                           team_members_at_creation, additional_staff)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;

    for j in jobs {
        stmt.execute(params![
            j.id,
            j.customer_id,
            j.team_id,
            j.status.as_str(),
            format_utc(&j.created_at),
            j.price.to_string(),
            serde_json::to_string(&j.team_members_at_creation)?,
            serde_json::to_string(&j.additional_staff)?,
        ])?;
    }
    Ok(jobs.len())
}

fn insert_time_entries(conn: &Connection, entries: &[TimeEntry]) -> AppResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO time_entries (id, user_id, staff, job_id, clock_in_time, clock_out_time)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;

    for e in entries {
        let clock_out = e.clock_out_time.as_ref().map(format_utc);
        stmt.execute(params![
            e.id,
            e.user_id,
            e.staff,
            e.job_id,
            format_utc(&e.clock_in_time),
            clock_out,
        ])?;
    }
    Ok(entries.len())
}

fn insert_memberships(conn: &Connection, rows: &[MembershipInterval]) -> AppResult<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO team_memberships (team_id, name, original_team, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;

    for m in rows {
        stmt.execute(params![
            m.team_id,
            m.name,
            m.original_team,
            format_dmy(&m.start),
            format_dmy(&m.end),
        ])?;
    }
    Ok(rows.len())
}

/// Replace customers, jobs, time entries and memberships in one go.
pub fn replace_staging(
    pool: &mut DbPool,
    customers: &[Customer],
    jobs: &[Job],
    entries: &[TimeEntry],
    memberships: &[MembershipInterval],
) -> AppResult<LoadCounts> {
    pool.with_transaction(|tx| {
        // children first: foreign keys are enforced
        tx.execute_batch(
            "DELETE FROM time_entries;
             DELETE FROM jobs;
             DELETE FROM customers;
             DELETE FROM team_memberships;",
        )?;

        Ok::<_, AppError>(LoadCounts {
            customers: insert_customers(tx, customers)?,
            jobs: insert_jobs(tx, jobs)?,
            time_entries: insert_time_entries(tx, entries)?,
            memberships: insert_memberships(tx, memberships)?,
        })
    })
}

pub fn count_rows(conn: &Connection, table: &str) -> AppResult<i64> {
    let n = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
    Ok(n)
}
