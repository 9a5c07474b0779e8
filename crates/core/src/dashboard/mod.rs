//! Dashboard module - progress metrics over the programs visible to a user.

mod dashboard_model;
mod dashboard_service;
mod dashboard_traits;

pub use dashboard_model::{
    progress_percentage, round2, DashboardMetrics, MetricsTally, PprProgressSummary,
    ProgressStatus, ScheduleFilter, ScheduleSelection, SubProductProgress,
};
pub use dashboard_service::DashboardService;
pub use dashboard_traits::DashboardServiceTrait;
