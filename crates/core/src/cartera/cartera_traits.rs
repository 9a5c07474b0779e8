use async_trait::async_trait;

use super::cartera_model::{CarteraEntry, CarteraPprCreation, CarteraProgram, CreatedPpr, NewCarteraEntry};
use crate::errors::Result;

/// Trait for service portfolio persistence
#[async_trait]
pub trait CarteraRepositoryTrait: Send + Sync {
    fn list_entries(&self) -> Result<Vec<CarteraEntry>>;
    async fn append(&self, entries: Vec<NewCarteraEntry>) -> Result<usize>;
    /// Creates every program whose (code, year) does not exist yet, with
    /// zero-filled PPR and CEPLAN schedules for each sub-product. Existing
    /// programs are skipped.
    async fn create_programs(
        &self,
        programs: Vec<CarteraProgram>,
        year: i32,
    ) -> Result<Vec<CreatedPpr>>;
}

#[async_trait]
pub trait CarteraServiceTrait: Send + Sync {
    fn list_entries(&self) -> Result<Vec<CarteraEntry>>;
    async fn store_entries(&self, entries: Vec<NewCarteraEntry>) -> Result<usize>;
    async fn create_pprs_from_cartera(&self, year: i32) -> Result<CarteraPprCreation>;
}
