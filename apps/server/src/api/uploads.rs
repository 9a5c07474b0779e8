use std::sync::Arc;

use crate::{
    auth::CurrentUser,
    error::{ApiError, ApiResult},
    extract::{ApiMultipart, ApiPath, ApiQuery},
    main_lib::AppState,
    models::{CommitResponse, PreviewResponse, YearQuery},
};
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Extension, Json, Router,
};
use monitor_ppr_core::{
    constants::MAX_SCHEDULE_UPLOAD_BYTES,
    imports::{CeplanImportResult, PprImportResult, UploadReceipt, UploadRequest},
    staging::{StagedUpload, UploadKind},
    users::access,
};

/// Room for the multipart framing around the largest accepted workbook.
pub(crate) const UPLOAD_BODY_LIMIT: usize = MAX_SCHEDULE_UPLOAD_BYTES + 1024 * 1024;

struct UploadedFile {
    filename: String,
    bytes: Vec<u8>,
}

/// Reads the `file` part of a multipart upload; other parts are ignored.
async fn read_file_part(mut multipart: Multipart) -> ApiResult<UploadedFile> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("No se pudo leer el formulario: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("No se pudo leer el archivo: {}", e)))?
            .to_vec();
        return Ok(UploadedFile { filename, bytes });
    }
    Err(ApiError::BadRequest(
        "No se recibió ningún archivo".to_string(),
    ))
}

pub(crate) async fn stage_upload(
    state: &AppState,
    kind: UploadKind,
    uploader: &str,
    year: i32,
    multipart: Multipart,
) -> ApiResult<Json<UploadReceipt>> {
    let file = read_file_part(multipart).await?;
    tracing::info!(
        "User {} uploading {} file {} ({} bytes)",
        uploader,
        kind,
        file.filename,
        file.bytes.len()
    );
    let receipt = state
        .import_service
        .upload(
            kind,
            UploadRequest {
                filename: file.filename,
                bytes: file.bytes,
                uploaded_by: uploader.to_string(),
                year,
            },
        )
        .await?;
    Ok(Json(receipt))
}

#[utoipa::path(
    post,
    path = "/api/v1/upload/ppr",
    request_body(content = String, content_type = "multipart/form-data", description = "Workbook in the `file` part"),
    params(YearQuery),
    responses((status = 200, description = "Workbook staged for preview"), (status = 400, description = "Missing or invalid file"))
)]
pub async fn upload_ppr(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<YearQuery>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<Json<UploadReceipt>> {
    access::ensure_ppr_manager(&user)?;
    stage_upload(
        &state,
        UploadKind::Ppr,
        &user.name,
        query.year_or_current(),
        multipart,
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/v1/upload/preview/{id}",
    params(("id" = String, Path, description = "Preview id")),
    responses((status = 200, description = "Staged extraction"), (status = 404, description = "Unknown preview"))
)]
pub async fn preview_ppr(
    ApiPath(preview_id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PreviewResponse<StagedUpload>>> {
    let staged = state
        .import_service
        .preview(UploadKind::Ppr, &preview_id)
        .await?;
    Ok(Json(PreviewResponse {
        preview_id,
        data: staged,
        message: "Vista previa obtenida exitosamente".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/upload/commit/{id}",
    params(("id" = String, Path, description = "Preview id")),
    responses((status = 200, description = "PPR stored from the staged extraction"), (status = 404, description = "Unknown preview"))
)]
pub async fn commit_ppr(
    ApiPath(preview_id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<CommitResponse<PprImportResult>>> {
    access::ensure_ppr_manager(&user)?;
    let result = state.import_service.commit_ppr(&preview_id).await?;
    tracing::info!(
        "User {} committed PPR preview {} into PPR {}",
        user.email,
        preview_id,
        result.ppr_id
    );
    Ok(Json(CommitResponse {
        preview_id,
        result,
        message: "Datos PPR comprometidos exitosamente".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/upload/ceplan",
    request_body(content = String, content_type = "multipart/form-data", description = "Workbook in the `file` part"),
    params(YearQuery),
    responses((status = 200, description = "Workbook staged for preview"), (status = 400, description = "Missing or invalid file"))
)]
pub async fn upload_ceplan(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<YearQuery>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<Json<UploadReceipt>> {
    access::ensure_planning_manager(&user)?;
    stage_upload(
        &state,
        UploadKind::Ceplan,
        &user.name,
        query.year_or_current(),
        multipart,
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/v1/upload/preview-ceplan/{id}",
    params(("id" = String, Path, description = "Preview id")),
    responses((status = 200, description = "Staged extraction"), (status = 404, description = "Unknown preview"))
)]
pub async fn preview_ceplan(
    ApiPath(preview_id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PreviewResponse<StagedUpload>>> {
    let staged = state
        .import_service
        .preview(UploadKind::Ceplan, &preview_id)
        .await?;
    Ok(Json(PreviewResponse {
        preview_id,
        data: staged,
        message: "Vista previa CEPLAN obtenida exitosamente".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/upload/commit-ceplan/{id}",
    params(("id" = String, Path, description = "Preview id"), YearQuery),
    responses((status = 200, description = "CEPLAN schedules stored for the year"), (status = 404, description = "Unknown preview"))
)]
pub async fn commit_ceplan(
    ApiPath(preview_id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<YearQuery>,
) -> ApiResult<Json<CommitResponse<CeplanImportResult>>> {
    access::ensure_planning_manager(&user)?;
    let year = query.year_or_current();
    let result = state
        .import_service
        .commit_ceplan(&preview_id, year)
        .await?;
    tracing::info!(
        "User {} committed CEPLAN preview {} for {} ({} rows)",
        user.email,
        preview_id,
        year,
        result.processed_count
    );
    Ok(Json(CommitResponse {
        preview_id,
        result,
        message: "Datos CEPLAN comprometidos exitosamente".to_string(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload/ppr", post(upload_ppr))
        .route("/upload/preview/{id}", get(preview_ppr))
        .route("/upload/commit/{id}", post(commit_ppr))
        .route("/upload/ceplan", post(upload_ceplan))
        .route("/upload/preview-ceplan/{id}", get(preview_ceplan))
        .route("/upload/commit-ceplan/{id}", post(commit_ceplan))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}
