//! Schedules module - monthly programmed/executed series for sub-products.

mod schedules_model;
mod schedules_service;
mod schedules_traits;

pub use schedules_model::{
    trailing_months, CeplanSchedule, Month, MonthSnapshot, MonthlyValues, PprSchedule,
    ProgressUpdate, ScheduleOverride, ScheduleOverrideRequest,
};
pub use schedules_service::ScheduleService;
pub use schedules_traits::{ScheduleRepositoryTrait, ScheduleServiceTrait};
