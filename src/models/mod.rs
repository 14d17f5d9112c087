pub mod customer;
pub mod job;
pub mod observation;
pub mod period;
pub mod run_summary;
