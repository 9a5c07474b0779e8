use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, error, info, warn};
use sha2::{Digest, Sha256};
use tokio::fs;
use uuid::Uuid;

use super::imports_model::{
    CarteraImportResult, CeplanImportResult, PprImportResult, UploadReceipt, UploadRequest,
};
use super::imports_traits::{ImportRepositoryTrait, ImportServiceTrait};
use crate::cartera::CarteraRepositoryTrait;
use crate::constants::ALLOWED_UPLOAD_EXTENSIONS;
use crate::errors::{Error, ExtractionError, Result};
use crate::extraction::{extract_cartera, extract_ceplan, extract_ppr, PprCatalog, Sheet};
use crate::staging::{
    StagedPayload, StagedUpload, StagingClaim, StagingStoreTrait, UploadKind, UploadMetadata,
};

const UPLOADS_DIR: &str = "uploads";
const PARSED_STATUS: &str = "parsed_for_preview";

pub struct ImportService {
    repository: Arc<dyn ImportRepositoryTrait>,
    cartera: Arc<dyn CarteraRepositoryTrait>,
    staging: Arc<dyn StagingStoreTrait>,
    catalog: Arc<PprCatalog>,
    uploads_dir: PathBuf,
}

impl ImportService {
    pub fn new(
        repository: Arc<dyn ImportRepositoryTrait>,
        cartera: Arc<dyn CarteraRepositoryTrait>,
        staging: Arc<dyn StagingStoreTrait>,
        catalog: Arc<PprCatalog>,
        data_dir: impl AsRef<Path>,
    ) -> Self {
        Self {
            repository,
            cartera,
            staging,
            catalog,
            uploads_dir: data_dir.as_ref().join(UPLOADS_DIR),
        }
    }

    /// Deletes the claimed preview after a successful commit, or puts it back
    /// so the commit can be retried.
    async fn settle<T: Send>(&self, claim: StagingClaim, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.staging.complete(claim).await?;
                Ok(value)
            }
            Err(err) => {
                let preview_id = claim.upload.preview_id;
                if let Err(release_err) = self.staging.release(claim).await {
                    error!("Could not release preview {}: {}", preview_id, release_err);
                }
                Err(err)
            }
        }
    }
}

/// Checks name, emptiness and size of an upload before anything is written.
pub fn validate_upload(kind: UploadKind, filename: &str, size: usize) -> Result<()> {
    let lower = filename.to_lowercase();
    if !ALLOWED_UPLOAD_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return Err(Error::invalid("Solo se permiten archivos Excel (.xlsx, .xls)"));
    }
    if size == 0 {
        return Err(Error::invalid("El archivo está vacío"));
    }
    if size > kind.max_bytes() {
        return Err(Error::invalid(format!(
            "El archivo es demasiado grande. Máximo permitido: {}MB",
            kind.max_bytes() / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Final path component of a client-supplied filename.
fn safe_filename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.xlsx".to_string())
}

fn parse_workbook(
    kind: UploadKind,
    bytes: &[u8],
    catalog: &PprCatalog,
    year: i32,
) -> std::result::Result<StagedPayload, ExtractionError> {
    let sheet = Sheet::from_workbook_bytes(bytes)?;
    Ok(match kind {
        UploadKind::Ppr => StagedPayload::Ppr(extract_ppr(&sheet, catalog, year)),
        UploadKind::Ceplan => StagedPayload::Ceplan(extract_ceplan(&sheet)),
        UploadKind::Cartera => StagedPayload::Cartera(extract_cartera(&sheet)?),
    })
}

fn upload_message(kind: UploadKind) -> &'static str {
    match kind {
        UploadKind::Ppr => "Archivo PPR subido y procesado exitosamente",
        UploadKind::Ceplan => "Archivo CEPLAN subido y procesado exitosamente",
        UploadKind::Cartera => "Archivo de Cartera de Servicios subido y procesado exitosamente",
    }
}

fn unexpected_payload(kind: UploadKind) -> Error {
    Error::Unexpected(format!("staged payload does not match {kind}"))
}

#[async_trait::async_trait]
impl ImportServiceTrait for ImportService {
    async fn upload(&self, kind: UploadKind, request: UploadRequest) -> Result<UploadReceipt> {
        validate_upload(kind, &request.filename, request.bytes.len())?;

        let file_hash = hex::encode(Sha256::digest(&request.bytes));
        let filename = safe_filename(&request.filename);
        let dir = self.uploads_dir.join(kind.as_str());
        fs::create_dir_all(&dir).await?;
        let raw_path = dir.join(format!("{file_hash}_{filename}"));
        fs::write(&raw_path, &request.bytes).await?;
        debug!("Saved raw {} upload to {}", kind, raw_path.display());

        let size = request.bytes.len() as u64;
        let catalog = self.catalog.clone();
        let year = request.year;
        let bytes = request.bytes;
        let parsed = tokio::task::spawn_blocking(move || parse_workbook(kind, &bytes, &catalog, year))
            .await
            .map_err(|e| Error::Unexpected(format!("workbook parser failed: {e}")))?;

        let payload = match parsed {
            Ok(payload) => payload,
            Err(err) => {
                warn!("Could not parse {} upload '{}': {}", kind, filename, err);
                if let Err(e) = fs::remove_file(&raw_path).await {
                    warn!("Could not remove {}: {}", raw_path.display(), e);
                }
                return Err(err.into());
            }
        };

        let total_records = match &payload {
            StagedPayload::Cartera(extraction) => Some(extraction.total_records),
            _ => None,
        };
        let staged = StagedUpload {
            preview_id: Uuid::new_v4(),
            metadata: UploadMetadata {
                filename,
                size,
                file_hash,
                uploaded_by: request.uploaded_by,
                upload_date: chrono::Local::now().naive_local(),
            },
            payload,
        };
        self.staging.stage(&staged).await?;
        info!("{} file parsed for preview {}", kind, staged.preview_id);

        Ok(UploadReceipt {
            message: upload_message(kind).to_string(),
            preview_id: staged.preview_id,
            file_info: total_records.is_none().then_some(staged),
            total_records,
            status: PARSED_STATUS.to_string(),
        })
    }

    async fn preview(&self, kind: UploadKind, preview_id: &str) -> Result<StagedUpload> {
        self.staging.load(kind, preview_id).await
    }

    async fn commit_ppr(&self, preview_id: &str) -> Result<PprImportResult> {
        let claim = self.staging.claim(UploadKind::Ppr, preview_id).await?;
        let result = match &claim.upload.payload {
            StagedPayload::Ppr(extraction) => {
                let program = &extraction.ppr;
                if program.code.trim().is_empty()
                    || program.name.trim().is_empty()
                    || program.year <= 0
                {
                    Err(Error::invalid(
                        "Estructura de datos PPR inválida o incompleta: se requiere código, nombre y año",
                    ))
                } else {
                    self.repository.store_ppr(extraction.clone()).await
                }
            }
            _ => Err(unexpected_payload(UploadKind::Ppr)),
        };
        if let Ok(stored) = &result {
            info!(
                "Committed PPR preview {} into program {} ({} products)",
                preview_id, stored.ppr_id, stored.products_count
            );
        }
        self.settle(claim, result).await
    }

    async fn commit_ceplan(&self, preview_id: &str, year: i32) -> Result<CeplanImportResult> {
        let claim = self.staging.claim(UploadKind::Ceplan, preview_id).await?;
        let result = match &claim.upload.payload {
            StagedPayload::Ceplan(extraction) => {
                self.repository
                    .store_ceplan(extraction.sub_products.clone(), year)
                    .await
            }
            _ => Err(unexpected_payload(UploadKind::Ceplan)),
        };
        if let Ok(stored) = &result {
            info!(
                "Committed CEPLAN preview {} for {}: {} schedules",
                preview_id, year, stored.processed_count
            );
        }
        self.settle(claim, result).await
    }

    async fn commit_cartera(&self, preview_id: &str) -> Result<CarteraImportResult> {
        let claim = self.staging.claim(UploadKind::Cartera, preview_id).await?;
        let result = match &claim.upload.payload {
            StagedPayload::Cartera(extraction) => self
                .cartera
                .append(extraction.entries.clone())
                .await
                .map(|stored_count| CarteraImportResult { stored_count }),
            _ => Err(unexpected_payload(UploadKind::Cartera)),
        };
        self.settle(claim, result).await
    }
}
