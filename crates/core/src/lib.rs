//! Monitor PPR Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for monitoring budget programs:
//! spreadsheet extraction, the preview/commit workflow, comparison against
//! CEPLAN and dashboard metrics. It is database-agnostic and defines traits
//! that are implemented by the `storage-sqlite` crate.

pub mod assignments;
pub mod cartera;
pub mod comparison;
pub mod constants;
pub mod dashboard;
pub mod errors;
pub mod extraction;
pub mod imports;
pub mod pprs;
pub mod schedules;
pub mod staging;
pub mod users;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
