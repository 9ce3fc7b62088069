//! Defines the data structures and models used throughout the application.
//!
//! This includes the raw archive row types, the analytics report structures
//! returned to callers, and the monitoring-station models.

mod record;
mod reports;
mod station;

pub use record::*;
pub use reports::*;
pub use station::*;
