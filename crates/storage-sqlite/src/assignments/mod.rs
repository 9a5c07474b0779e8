//! SQLite storage implementation for manager assignments.

mod model;
mod repository;

pub use model::AssignmentDB;
pub use repository::AssignmentRepository;
