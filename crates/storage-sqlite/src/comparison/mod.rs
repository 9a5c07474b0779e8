//! SQLite storage for stored comparison differences.

mod model;
mod repository;

pub use model::{DifferenceDB, NewDifferenceDB};
pub use repository::ComparisonRepository;
