//! Entity id reassignment.
//!
//! Provisional ids depend on sheet order; these passes replace them with
//! dense ids derived from a canonical sort, and rewrite every foreign key.
//! A reference that no longer resolves aborts the run.

use crate::errors::{AppError, AppResult};
use crate::models::customer::Customer;
use crate::models::job::{Job, TimeEntry};
use std::collections::{HashMap, HashSet};

/// Sort jobs by `(created_at, customer_id, team_id)`, number them `1..N`
/// and point every time entry at its job's new id.
pub fn reassign_jobs(jobs: &mut [Job], entries: &mut [TimeEntry]) -> AppResult<()> {
    jobs.sort_by_key(|j| (j.created_at, j.customer_id, j.team_id));

    let mut id_map: HashMap<i64, i64> = HashMap::with_capacity(jobs.len());
    for (i, job) in jobs.iter_mut().enumerate() {
        let new_id = i as i64 + 1;
        if id_map.insert(job.id, new_id).is_some() {
            return Err(AppError::DanglingReference {
                entity: "job",
                key: format!("duplicate job id {}", job.id),
            });
        }
        job.id = new_id;
    }

    for entry in entries.iter_mut() {
        entry.job_id = *id_map
            .get(&entry.job_id)
            .ok_or_else(|| AppError::DanglingReference {
                entity: "job",
                key: entry.job_id.to_string(),
            })?;
    }

    Ok(())
}

/// Sort time entries by clock-in and number them `1..N`.
pub fn reassign_time_entries(entries: &mut [TimeEntry]) {
    entries.sort_by_key(|e| e.clock_in_time);
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.id = i as i64 + 1;
    }
}

/// Sort customers by registration, number them `1..N` and rewrite every
/// job's `customer_id` through the customer name.
pub fn reassign_customers(customers: &mut [Customer], jobs: &mut [Job]) -> AppResult<()> {
    customers.sort_by_key(|c| c.created_at);

    for (i, customer) in customers.iter_mut().enumerate() {
        customer.id = i as i64 + 1;
    }
    let by_name: HashMap<&str, i64> = customers
        .iter()
        .map(|c| (c.name.as_str(), c.id))
        .collect();

    for job in jobs.iter_mut() {
        job.customer_id = *by_name
            .get(job.customer_name.as_str())
            .ok_or_else(|| AppError::DanglingReference {
                entity: "customer",
                key: job.customer_name.clone(),
            })?;
    }

    Ok(())
}

/// Every time entry points at an existing job, every job at an existing
/// customer, and ids are unique.
pub fn check_integrity(
    jobs: &[Job],
    entries: &[TimeEntry],
    customers: &[Customer],
) -> AppResult<()> {
    let job_ids: HashSet<i64> = jobs.iter().map(|j| j.id).collect();
    let customer_ids: HashSet<i64> = customers.iter().map(|c| c.id).collect();

    if job_ids.len() != jobs.len() {
        return Err(AppError::DanglingReference {
            entity: "job",
            key: "duplicate job ids".to_string(),
        });
    }

    if let Some(e) = entries.iter().find(|e| !job_ids.contains(&e.job_id)) {
        return Err(AppError::DanglingReference {
            entity: "job",
            key: format!("time entry {} → job {}", e.id, e.job_id),
        });
    }

    if let Some(j) = jobs.iter().find(|j| !customer_ids.contains(&j.customer_id)) {
        return Err(AppError::DanglingReference {
            entity: "customer",
            key: format!("job {} → customer {} ({})", j.id, j.customer_id, j.customer_name),
        });
    }

    Ok(())
}
