//! Reconciliation engine: row extraction, period math, job building and
//! id reassignment. Nothing in here touches the filesystem.

pub mod calculator;
pub mod customers;
pub mod dates;
pub mod extract;
pub mod jobs;
pub mod logic;
pub mod reassign;
