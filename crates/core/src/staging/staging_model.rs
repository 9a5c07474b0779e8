//! Staged upload models.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_CARTERA_UPLOAD_BYTES, MAX_SCHEDULE_UPLOAD_BYTES};
use crate::errors::{Error, Result};
use crate::extraction::{CarteraExtraction, CeplanExtraction, PprExtraction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Ppr,
    Ceplan,
    Cartera,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadKind::Ppr => "ppr",
            UploadKind::Ceplan => "ceplan",
            UploadKind::Cartera => "cartera",
        }
    }

    pub fn max_bytes(&self) -> usize {
        match self {
            UploadKind::Ppr | UploadKind::Ceplan => MAX_SCHEDULE_UPLOAD_BYTES,
            UploadKind::Cartera => MAX_CARTERA_UPLOAD_BYTES,
        }
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ppr" => Ok(UploadKind::Ppr),
            "ceplan" => Ok(UploadKind::Ceplan),
            "cartera" => Ok(UploadKind::Cartera),
            other => Err(Error::invalid(format!("Tipo de archivo desconocido: {other}"))),
        }
    }
}

/// Facts about the uploaded file, shown in the preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    pub filename: String,
    pub size: u64,
    pub file_hash: String,
    pub uploaded_by: String,
    pub upload_date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum StagedPayload {
    Ppr(PprExtraction),
    Ceplan(CeplanExtraction),
    Cartera(CarteraExtraction),
}

impl StagedPayload {
    pub fn kind(&self) -> UploadKind {
        match self {
            StagedPayload::Ppr(_) => UploadKind::Ppr,
            StagedPayload::Ceplan(_) => UploadKind::Ceplan,
            StagedPayload::Cartera(_) => UploadKind::Cartera,
        }
    }
}

/// A parsed upload waiting to be committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedUpload {
    pub preview_id: Uuid,
    pub metadata: UploadMetadata,
    pub payload: StagedPayload,
}

impl StagedUpload {
    pub fn kind(&self) -> UploadKind {
        self.payload.kind()
    }
}

/// Exclusive hold on a staged upload taken for commit. Hand it back with
/// `complete` once the commit succeeded or `release` so it can be retried.
#[derive(Debug)]
pub struct StagingClaim {
    pub upload: StagedUpload,
    pub(crate) claimed_path: PathBuf,
}

/// Parses a preview id, rejecting anything that is not a UUID.
pub fn parse_preview_id(preview_id: &str) -> Result<Uuid> {
    Uuid::parse_str(preview_id.trim())
        .map_err(|_| Error::invalid("ID de vista previa inválido"))
}
