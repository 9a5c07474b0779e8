use async_trait::async_trait;

use super::imports_model::{
    CarteraImportResult, CeplanImportResult, PprImportResult, UploadReceipt, UploadRequest,
};
use crate::errors::Result;
use crate::extraction::{ExtractedSubProduct, PprExtraction};
use crate::staging::{StagedUpload, UploadKind};

/// Trait for persisting committed imports
#[async_trait]
pub trait ImportRepositoryTrait: Send + Sync {
    /// Upserts the program tree in a single transaction. Only sub-products
    /// created by this call receive a PPR schedule.
    async fn store_ppr(&self, extraction: PprExtraction) -> Result<PprImportResult>;

    /// Upserts CEPLAN schedules of `year` for every row whose code matches a
    /// known sub-product once leading zeros are ignored.
    async fn store_ceplan(
        &self,
        sub_products: Vec<ExtractedSubProduct>,
        year: i32,
    ) -> Result<CeplanImportResult>;
}

/// Upload, preview and commit of workbooks
#[async_trait]
pub trait ImportServiceTrait: Send + Sync {
    async fn upload(&self, kind: UploadKind, request: UploadRequest) -> Result<UploadReceipt>;
    async fn preview(&self, kind: UploadKind, preview_id: &str) -> Result<StagedUpload>;
    async fn commit_ppr(&self, preview_id: &str) -> Result<PprImportResult>;
    async fn commit_ceplan(&self, preview_id: &str, year: i32) -> Result<CeplanImportResult>;
    async fn commit_cartera(&self, preview_id: &str) -> Result<CarteraImportResult>;
}
