pub mod consolidate;
pub mod members;
pub mod resolve;
