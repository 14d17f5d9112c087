//! SQLite staging database: the target of the `load` command.

pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod queries;
