use log::{debug, info};
use std::sync::Arc;

use super::cartera_model::{group_entries, CarteraEntry, CarteraPprCreation, NewCarteraEntry};
use super::cartera_traits::{CarteraRepositoryTrait, CarteraServiceTrait};
use crate::errors::{Error, Result};

pub struct CarteraService {
    repository: Arc<dyn CarteraRepositoryTrait>,
}

impl CarteraService {
    pub fn new(repository: Arc<dyn CarteraRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl CarteraServiceTrait for CarteraService {
    fn list_entries(&self) -> Result<Vec<CarteraEntry>> {
        self.repository.list_entries()
    }

    async fn store_entries(&self, entries: Vec<NewCarteraEntry>) -> Result<usize> {
        let stored = self.repository.append(entries).await?;
        info!("Stored {} service portfolio records", stored);
        Ok(stored)
    }

    async fn create_pprs_from_cartera(&self, year: i32) -> Result<CarteraPprCreation> {
        let entries = self.repository.list_entries()?;
        if entries.is_empty() {
            return Err(Error::not_found(
                "No hay registros de Cartera de Servicios disponibles",
            ));
        }

        let programs = group_entries(entries.iter().map(|e| &e.entry));
        debug!(
            "Grouped {} portfolio rows into {} programs",
            entries.len(),
            programs.len()
        );

        let created = self.repository.create_programs(programs, year).await?;
        let total_sub_products = created.iter().map(|p| p.sub_product_count).sum();
        info!(
            "Created {} programs with {} sub-products from the service portfolio for {}",
            created.len(),
            total_sub_products,
            year
        );

        Ok(CarteraPprCreation {
            total_pprs: created.len(),
            total_sub_products,
            created_pprs: created,
        })
    }
}
