//! Assignments of program managers to programs.

mod assignments_service;
mod assignments_traits;

pub use assignments_service::AssignmentService;
pub use assignments_traits::{AssignmentRepositoryTrait, AssignmentServiceTrait};
