use std::time::Duration;

use async_trait::async_trait;

use super::staging_model::{StagedUpload, StagingClaim, UploadKind};
use crate::errors::Result;

/// Storage for parsed uploads between preview and commit.
#[async_trait]
pub trait StagingStoreTrait: Send + Sync {
    async fn stage(&self, upload: &StagedUpload) -> Result<()>;
    /// Reads a staged upload without taking it. Unknown ids and ids staged
    /// under another kind are not found.
    async fn load(&self, kind: UploadKind, preview_id: &str) -> Result<StagedUpload>;
    /// Takes exclusive hold of a staged upload. Only one caller wins.
    async fn claim(&self, kind: UploadKind, preview_id: &str) -> Result<StagingClaim>;
    async fn complete(&self, claim: StagingClaim) -> Result<()>;
    async fn release(&self, claim: StagingClaim) -> Result<()>;
    /// Removes staged and claimed documents last modified more than `age` ago.
    async fn purge_older_than(&self, age: Duration) -> Result<usize>;
}
