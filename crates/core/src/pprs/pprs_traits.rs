use async_trait::async_trait;

use super::pprs_model::{NewPpr, Ppr, PprDetail, PprHierarchy, PprStructure, Product, SubProduct};
use crate::errors::Result;

/// Trait for program repository operations
#[async_trait]
pub trait PprRepositoryTrait: Send + Sync {
    fn list(&self) -> Result<Vec<Ppr>>;
    fn list_by_ids(&self, ppr_ids: &[i32]) -> Result<Vec<Ppr>>;
    fn get_by_id(&self, ppr_id: i32) -> Result<Ppr>;
    fn find_by_code_and_year(&self, code: &str, year: i32) -> Result<Option<Ppr>>;
    fn list_products(&self, ppr_id: i32) -> Result<Vec<Product>>;
    fn load_hierarchy(&self, ppr_id: i32) -> Result<PprHierarchy>;
    fn get_sub_product(&self, sub_product_id: i32) -> Result<SubProduct>;
    async fn create(&self, new_ppr: NewPpr) -> Result<Ppr>;
    async fn update(&self, ppr_id: i32, changes: NewPpr) -> Result<Ppr>;
    /// Deletes the program and everything below it.
    async fn delete(&self, ppr_id: i32) -> Result<usize>;
    async fn delete_by_year(&self, year: i32) -> Result<usize>;
}

/// Trait for program service operations
#[async_trait]
pub trait PprServiceTrait: Send + Sync {
    fn list_pprs(&self) -> Result<Vec<Ppr>>;
    fn get_ppr(&self, ppr_id: i32) -> Result<Ppr>;
    fn get_products(&self, ppr_id: i32) -> Result<Vec<Product>>;
    fn get_detail(&self, ppr_id: i32) -> Result<PprDetail>;
    fn get_structure(&self, ppr_id: i32) -> Result<PprStructure>;
    async fn create_ppr(&self, new_ppr: NewPpr) -> Result<Ppr>;
    async fn update_ppr(&self, ppr_id: i32, changes: NewPpr) -> Result<Ppr>;
    async fn delete_ppr(&self, ppr_id: i32) -> Result<()>;
    async fn delete_by_year(&self, year: i32) -> Result<usize>;
}
