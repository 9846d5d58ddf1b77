// Core domain types and statistics for FRED economic data

pub mod stats;
pub mod types;

pub use types::*;
