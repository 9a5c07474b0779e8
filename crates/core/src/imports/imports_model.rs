use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::staging::StagedUpload;

/// Raw workbook received from a client.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Display name of the uploader.
    pub uploaded_by: String,
    /// Year stamped on PPR extractions.
    pub year: i32,
}

/// Answer to a successful upload; the parsed content waits under `preview_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub message: String,
    pub preview_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_info: Option<StagedUpload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_records: Option<usize>,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PprImportResult {
    pub ppr_id: i32,
    pub products_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CeplanImportResult {
    pub processed_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarteraImportResult {
    pub stored_count: usize,
}

/// Strips leading zeros so `0087901` and `87901` name the same sub-product.
pub fn normalized_sub_product_code(code: &str) -> &str {
    code.trim().trim_start_matches('0')
}
