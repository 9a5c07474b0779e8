//! Imports module - upload validation, staging for preview and commit of parsed workbooks.

mod imports_model;
mod imports_service;
mod imports_traits;

pub use imports_model::{
    normalized_sub_product_code, CarteraImportResult, CeplanImportResult, PprImportResult,
    UploadReceipt, UploadRequest,
};
pub use imports_service::{validate_upload, ImportService};
pub use imports_traits::{ImportRepositoryTrait, ImportServiceTrait};
