use async_trait::async_trait;
use chrono::NaiveDate;

use super::schedules_model::{
    CeplanSchedule, MonthSnapshot, PprSchedule, ProgressUpdate, ScheduleOverrideRequest,
};
use crate::errors::Result;

/// Trait for schedule repository operations
#[async_trait]
pub trait ScheduleRepositoryTrait: Send + Sync {
    fn ppr_schedules_for(&self, sub_product_ids: &[i32]) -> Result<Vec<PprSchedule>>;
    fn ceplan_schedules_for(&self, sub_product_ids: &[i32]) -> Result<Vec<CeplanSchedule>>;
    /// Persists target and monthly values of an existing schedule, stamping `updated_at`.
    async fn save_ppr_schedule(&self, schedule: PprSchedule) -> Result<PprSchedule>;
}

/// Trait for schedule service operations
#[async_trait]
pub trait ScheduleServiceTrait: Send + Sync {
    async fn update_progress(
        &self,
        sub_product_id: i32,
        update: ProgressUpdate,
    ) -> Result<PprSchedule>;
    fn recent_months(&self, sub_product_id: i32, today: NaiveDate) -> Result<Vec<MonthSnapshot>>;
    async fn override_schedule(
        &self,
        sub_product_id: i32,
        request: ScheduleOverrideRequest,
    ) -> Result<Option<PprSchedule>>;
}
