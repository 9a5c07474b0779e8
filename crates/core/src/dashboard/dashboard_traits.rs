use super::dashboard_model::{
    DashboardMetrics, PprProgressSummary, ScheduleFilter, SubProductProgress,
};
use crate::errors::Result;
use crate::pprs::Ppr;
use crate::users::User;

/// Read-only progress views scoped to the programs a user may see
pub trait DashboardServiceTrait: Send + Sync {
    fn assigned_pprs(&self, user: &User) -> Result<Vec<Ppr>>;
    fn assigned_summary(&self, user: &User) -> Result<Vec<PprProgressSummary>>;
    fn ppr_metrics(
        &self,
        user: &User,
        ppr_id: i32,
        filter: ScheduleFilter,
    ) -> Result<DashboardMetrics>;
    fn general_metrics(&self, user: &User, filter: ScheduleFilter) -> Result<DashboardMetrics>;
    fn ppr_sub_products(
        &self,
        user: &User,
        ppr_id: i32,
        filter: ScheduleFilter,
    ) -> Result<Vec<SubProductProgress>>;
    fn all_sub_products(&self, user: &User) -> Result<Vec<SubProductProgress>>;
}
