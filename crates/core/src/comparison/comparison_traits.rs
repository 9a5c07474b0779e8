use async_trait::async_trait;

use super::comparison_model::{
    ComparisonRow, ComparisonRun, ComparisonSummary, Difference, NewDifference,
};
use crate::errors::Result;

/// Trait for stored comparison results
#[async_trait]
pub trait ComparisonRepositoryTrait: Send + Sync {
    fn differences_for(&self, sub_product_ids: &[i32]) -> Result<Vec<Difference>>;
    /// Drops every stored difference of the given sub-products and inserts
    /// `differences` in the same transaction.
    async fn replace_differences(
        &self,
        sub_product_ids: Vec<i32>,
        differences: Vec<NewDifference>,
    ) -> Result<usize>;
}

#[async_trait]
pub trait ComparisonServiceTrait: Send + Sync {
    async fn compare(&self, ppr_id: i32) -> Result<ComparisonRun>;
    fn results(&self, ppr_id: i32) -> Result<Vec<ComparisonRow>>;
    fn summary(&self, ppr_id: i32) -> Result<ComparisonSummary>;
}
