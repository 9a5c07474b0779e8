//! Staging module - parsed uploads kept between preview and commit.

mod file_store;
mod staging_model;
mod staging_traits;

pub use file_store::FileStagingStore;
pub use staging_model::{
    parse_preview_id, StagedPayload, StagedUpload, StagingClaim, UploadKind, UploadMetadata,
};
pub use staging_traits::StagingStoreTrait;
