use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;

use super::pprs_model::{
    NewPpr, Ppr, PprDetail, PprStructure, Product, ScheduleView, StructureActivity,
    StructureProduct, StructureSubProduct,
};
use super::pprs_traits::{PprRepositoryTrait, PprServiceTrait};
use crate::errors::{Error, Result};
use crate::schedules::ScheduleRepositoryTrait;

const DUPLICATE_PPR: &str = "Ya existe un PPR con el mismo código y año";

/// Service for the program catalogue
pub struct PprService {
    repository: Arc<dyn PprRepositoryTrait>,
    schedules: Arc<dyn ScheduleRepositoryTrait>,
}

impl PprService {
    pub fn new(
        repository: Arc<dyn PprRepositoryTrait>,
        schedules: Arc<dyn ScheduleRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            schedules,
        }
    }

    fn normalized(mut input: NewPpr) -> Result<NewPpr> {
        input.validate()?;
        input.code = input.code.trim().to_string();
        input.name = input.name.trim().to_string();
        Ok(input)
    }
}

/// Maps a missing row onto the program-level 404.
pub(crate) fn ppr_not_found(err: Error) -> Error {
    if err.is_not_found() {
        Error::not_found("PPR no encontrado")
    } else {
        err
    }
}

#[async_trait::async_trait]
impl PprServiceTrait for PprService {
    fn list_pprs(&self) -> Result<Vec<Ppr>> {
        self.repository.list()
    }

    fn get_ppr(&self, ppr_id: i32) -> Result<Ppr> {
        self.repository.get_by_id(ppr_id).map_err(ppr_not_found)
    }

    fn get_products(&self, ppr_id: i32) -> Result<Vec<Product>> {
        self.get_ppr(ppr_id)?;
        self.repository.list_products(ppr_id)
    }

    fn get_detail(&self, ppr_id: i32) -> Result<PprDetail> {
        let ppr = self.get_ppr(ppr_id)?;
        let hierarchy = self.repository.load_hierarchy(ppr_id)?;
        Ok(PprDetail::assemble(ppr, hierarchy))
    }

    fn get_structure(&self, ppr_id: i32) -> Result<PprStructure> {
        let detail = self.get_detail(ppr_id)?;
        let year = detail.ppr.year;
        let sub_ids: Vec<i32> = detail
            .products
            .iter()
            .flat_map(|p| &p.activities)
            .flat_map(|a| &a.sub_products)
            .map(|s| s.id)
            .collect();

        let ppr_schedules: HashMap<i32, ScheduleView> = self
            .schedules
            .ppr_schedules_for(&sub_ids)?
            .iter()
            .filter(|s| s.year == year)
            .map(|s| (s.sub_product_id, ScheduleView::from(s)))
            .collect();
        let ceplan_schedules: HashMap<i32, ScheduleView> = self
            .schedules
            .ceplan_schedules_for(&sub_ids)?
            .iter()
            .filter(|s| s.year == year)
            .map(|s| (s.sub_product_id, ScheduleView::from(s)))
            .collect();
        debug!(
            "Structure of PPR {}: {} sub-products, {} PPR and {} CEPLAN schedules",
            ppr_id,
            sub_ids.len(),
            ppr_schedules.len(),
            ceplan_schedules.len()
        );

        let products = detail
            .products
            .into_iter()
            .map(|p| StructureProduct {
                code: p.product.code,
                name: p.product.name,
                activities: p
                    .activities
                    .into_iter()
                    .map(|a| StructureActivity {
                        code: a.activity.code,
                        name: a.activity.name,
                        sub_products: a
                            .sub_products
                            .into_iter()
                            .map(|s| StructureSubProduct {
                                ppr_schedule: ppr_schedules.get(&s.id).cloned(),
                                ceplan_schedule: ceplan_schedules.get(&s.id).cloned(),
                                id: s.id,
                                code: s.code,
                                name: s.name,
                                unit_of_measure: s.unit_of_measure,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Ok(PprStructure {
            ppr: detail.ppr,
            products,
        })
    }

    async fn create_ppr(&self, new_ppr: NewPpr) -> Result<Ppr> {
        let input = Self::normalized(new_ppr)?;
        if self
            .repository
            .find_by_code_and_year(&input.code, input.year)?
            .is_some()
        {
            return Err(Error::invalid(DUPLICATE_PPR));
        }
        let ppr = self.repository.create(input).await?;
        info!("Created PPR {} ({})", ppr.code, ppr.year);
        Ok(ppr)
    }

    async fn update_ppr(&self, ppr_id: i32, changes: NewPpr) -> Result<Ppr> {
        self.get_ppr(ppr_id)?;
        let input = Self::normalized(changes)?;
        if let Some(other) = self
            .repository
            .find_by_code_and_year(&input.code, input.year)?
        {
            if other.id != ppr_id {
                return Err(Error::invalid(DUPLICATE_PPR));
            }
        }
        self.repository.update(ppr_id, input).await
    }

    async fn delete_ppr(&self, ppr_id: i32) -> Result<()> {
        let ppr = self.get_ppr(ppr_id)?;
        self.repository.delete(ppr_id).await?;
        info!("Deleted PPR {} ({})", ppr.code, ppr.year);
        Ok(())
    }

    async fn delete_by_year(&self, year: i32) -> Result<usize> {
        let deleted = self.repository.delete_by_year(year).await?;
        info!("Deleted {} PPRs of year {}", deleted, year);
        Ok(deleted)
    }
}
