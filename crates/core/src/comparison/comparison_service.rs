use log::info;
use std::collections::HashMap;
use std::sync::Arc;

use super::comparison_model::{
    compute_difference, ComparisonRow, ComparisonRun, ComparisonSummary, MonthlyDifferences,
    NewDifference,
};
use super::comparison_traits::{ComparisonRepositoryTrait, ComparisonServiceTrait};
use crate::errors::Result;
use crate::pprs::{ppr_not_found, PprHierarchy, PprRepositoryTrait};
use crate::schedules::{CeplanSchedule, MonthlyValues, PprSchedule, ScheduleRepositoryTrait};

pub struct ComparisonService {
    repository: Arc<dyn ComparisonRepositoryTrait>,
    pprs: Arc<dyn PprRepositoryTrait>,
    schedules: Arc<dyn ScheduleRepositoryTrait>,
}

impl ComparisonService {
    pub fn new(
        repository: Arc<dyn ComparisonRepositoryTrait>,
        pprs: Arc<dyn PprRepositoryTrait>,
        schedules: Arc<dyn ScheduleRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            pprs,
            schedules,
        }
    }

    fn hierarchy(&self, ppr_id: i32) -> Result<PprHierarchy> {
        self.pprs.get_by_id(ppr_id).map_err(ppr_not_found)?;
        self.pprs.load_hierarchy(ppr_id)
    }
}

#[async_trait::async_trait]
impl ComparisonServiceTrait for ComparisonService {
    async fn compare(&self, ppr_id: i32) -> Result<ComparisonRun> {
        let sub_ids = self.hierarchy(ppr_id)?.sub_product_ids();

        let ceplan: HashMap<(i32, i32), CeplanSchedule> = self
            .schedules
            .ceplan_schedules_for(&sub_ids)?
            .into_iter()
            .map(|s| ((s.sub_product_id, s.year), s))
            .collect();
        let mut ppr = self.schedules.ppr_schedules_for(&sub_ids)?;
        ppr.sort_by_key(|s| (s.sub_product_id, s.year));

        let differences: Vec<NewDifference> = ppr
            .iter()
            .filter_map(|p| {
                ceplan
                    .get(&(p.sub_product_id, p.year))
                    .map(|c| compute_difference(p, c))
            })
            .collect();

        let total_differences = self
            .repository
            .replace_differences(sub_ids, differences)
            .await?;
        info!(
            "Comparison of PPR {} stored {} differences",
            ppr_id, total_differences
        );
        Ok(ComparisonRun {
            message: format!(
                "Comparison completed. Created {total_differences} difference records."
            ),
            total_differences,
        })
    }

    fn results(&self, ppr_id: i32) -> Result<Vec<ComparisonRow>> {
        let hierarchy = self.hierarchy(ppr_id)?;
        let sub_ids = hierarchy.sub_product_ids();
        let subs: HashMap<i32, _> = hierarchy.sub_products.iter().map(|s| (s.id, s)).collect();

        let ppr: HashMap<(i32, i32), PprSchedule> = self
            .schedules
            .ppr_schedules_for(&sub_ids)?
            .into_iter()
            .map(|s| ((s.sub_product_id, s.year), s))
            .collect();
        let ceplan: HashMap<(i32, i32), CeplanSchedule> = self
            .schedules
            .ceplan_schedules_for(&sub_ids)?
            .into_iter()
            .map(|s| ((s.sub_product_id, s.year), s))
            .collect();

        let rows = self
            .repository
            .differences_for(&sub_ids)?
            .into_iter()
            .filter(|d| !d.is_flat())
            .map(|d| {
                let key = (d.sub_product_id, d.year);
                let sub = subs.get(&d.sub_product_id);
                let ppr = ppr.get(&key);
                let ceplan = ceplan.get(&key);
                let series = |v: Option<&MonthlyValues>| {
                    v.map(MonthlyValues::filled)
                        .unwrap_or_else(MonthlyValues::zeros)
                };
                ComparisonRow {
                    difference_id: d.id,
                    sub_product_id: d.sub_product_id,
                    sub_product_code: sub.map(|s| s.code.clone()),
                    sub_product_name: sub.map(|s| s.name.clone()),
                    year: d.year,
                    status: d.status,
                    ppr_annual_target: ppr.and_then(|p| p.annual_target).unwrap_or(0.0),
                    ceplan_annual_target: ceplan.map(CeplanSchedule::annual_target).unwrap_or(0.0),
                    ppr_programmed: series(ppr.map(|p| &p.programmed)),
                    ppr_executed: series(ppr.map(|p| &p.executed)),
                    ceplan_programmed: series(ceplan.map(|c| &c.programmed)),
                    ceplan_executed: series(ceplan.map(|c| &c.executed)),
                    differences: MonthlyDifferences {
                        programmed: d.programmed,
                        executed: d.executed,
                    },
                    created_at: d.created_at,
                }
            })
            .collect();
        Ok(rows)
    }

    fn summary(&self, ppr_id: i32) -> Result<ComparisonSummary> {
        Ok(ComparisonSummary::from_rows(&self.results(ppr_id)?))
    }
}
