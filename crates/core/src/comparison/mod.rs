//! Comparison module - monthly differences between PPR and CEPLAN schedules.

mod comparison_model;
mod comparison_service;
mod comparison_traits;

pub use comparison_model::{
    classify, compute_difference, ComparisonRow, ComparisonRun, ComparisonSummary, Difference,
    DifferenceStatus, MonthlyDifferences, NewDifference,
};
pub use comparison_service::ComparisonService;
pub use comparison_traits::{ComparisonRepositoryTrait, ComparisonServiceTrait};
