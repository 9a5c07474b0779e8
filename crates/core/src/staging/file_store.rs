//! JSON-on-disk staging store.
//!
//! Layout under `<data_dir>/staging/`:
//! - `<preview_id>.json` a staged upload;
//! - `<preview_id>.json.claimed` an upload held by an in-flight commit.
//!
//! Claiming is a rename, so concurrent commits of the same preview race on
//! the filesystem and exactly one of them succeeds.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::fs;
use uuid::Uuid;

use super::staging_model::{parse_preview_id, StagedUpload, StagingClaim, UploadKind};
use super::staging_traits::StagingStoreTrait;
use crate::errors::{Error, Result};

const STAGING_DIR: &str = "staging";
const CLAIMED_SUFFIX: &str = ".claimed";

pub struct FileStagingStore {
    dir: PathBuf,
}

impl FileStagingStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().join(STAGING_DIR),
        }
    }

    fn staged_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn claimed_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json{CLAIMED_SUFFIX}"))
    }

    async fn read(path: &Path) -> Result<StagedUpload> {
        let content = fs::read(path).await.map_err(missing_as_not_found)?;
        Ok(serde_json::from_slice(&content)?)
    }
}

fn preview_not_found() -> Error {
    Error::not_found("Vista previa no encontrada")
}

fn missing_as_not_found(err: std::io::Error) -> Error {
    if err.kind() == ErrorKind::NotFound {
        preview_not_found()
    } else {
        err.into()
    }
}

#[async_trait]
impl StagingStoreTrait for FileStagingStore {
    async fn stage(&self, upload: &StagedUpload) -> Result<()> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.staged_path(upload.preview_id);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(upload)?).await?;
        fs::rename(&tmp, &path).await?;
        debug!("Staged {} upload {}", upload.kind(), upload.preview_id);
        Ok(())
    }

    async fn load(&self, kind: UploadKind, preview_id: &str) -> Result<StagedUpload> {
        let id = parse_preview_id(preview_id)?;
        let upload = Self::read(&self.staged_path(id)).await?;
        if upload.kind() != kind {
            return Err(preview_not_found());
        }
        Ok(upload)
    }

    async fn claim(&self, kind: UploadKind, preview_id: &str) -> Result<StagingClaim> {
        let id = parse_preview_id(preview_id)?;
        let staged = self.staged_path(id);
        let claimed = self.claimed_path(id);
        fs::rename(&staged, &claimed)
            .await
            .map_err(missing_as_not_found)?;

        let upload = match Self::read(&claimed).await {
            Ok(upload) if upload.kind() == kind => upload,
            Ok(_) => {
                fs::rename(&claimed, &staged).await?;
                return Err(preview_not_found());
            }
            Err(e) => {
                fs::rename(&claimed, &staged).await?;
                return Err(e);
            }
        };
        Ok(StagingClaim {
            upload,
            claimed_path: claimed,
        })
    }

    async fn complete(&self, claim: StagingClaim) -> Result<()> {
        fs::remove_file(&claim.claimed_path).await?;
        debug!("Removed committed preview {}", claim.upload.preview_id);
        Ok(())
    }

    async fn release(&self, claim: StagingClaim) -> Result<()> {
        let staged = self.staged_path(claim.upload.preview_id);
        fs::rename(&claim.claimed_path, &staged).await?;
        debug!("Released preview {}", claim.upload.preview_id);
        Ok(())
    }

    async fn purge_older_than(&self, age: Duration) -> Result<usize> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let now = SystemTime::now();
        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let modified = match entry.metadata().await.and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(e) => {
                    warn!("Skipping {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            let expired = now
                .duration_since(modified)
                .map(|elapsed| elapsed > age)
                .unwrap_or(false);
            if expired && fs::remove_file(entry.path()).await.is_ok() {
                removed += 1;
            }
        }

        if removed > 0 {
            info!("Purged {} abandoned previews", removed);
        }
        Ok(removed)
    }
}
