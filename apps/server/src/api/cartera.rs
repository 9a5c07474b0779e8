use std::sync::Arc;

use crate::{
    api::uploads::{stage_upload, UPLOAD_BODY_LIMIT},
    auth::CurrentUser,
    error::ApiResult,
    extract::{ApiMultipart, ApiPath},
    main_lib::AppState,
    models::{current_year, CommitResponse, DataResponse, PreviewResponse},
};
use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Extension, Json, Router,
};
use monitor_ppr_core::{
    cartera::CarteraEntry,
    imports::{CarteraImportResult, UploadReceipt},
    staging::{StagedUpload, UploadKind},
    users::access,
};

#[utoipa::path(
    post,
    path = "/api/v1/cartera",
    request_body(content = String, content_type = "multipart/form-data", description = "Workbook in the `file` part"),
    responses((status = 200, description = "Workbook staged for preview"), (status = 400, description = "Missing or invalid file"))
)]
pub async fn upload_cartera(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiMultipart(multipart): ApiMultipart,
) -> ApiResult<Json<UploadReceipt>> {
    access::ensure_planning_manager(&user)?;
    stage_upload(
        &state,
        UploadKind::Cartera,
        &user.name,
        current_year(),
        multipart,
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/v1/cartera",
    responses((status = 200, description = "Stored service portfolio rows"))
)]
pub async fn list_cartera(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DataResponse<Vec<CarteraEntry>>>> {
    let entries = state.cartera_service.list_entries()?;
    let total = entries.len();
    Ok(Json(DataResponse::counted(
        entries,
        total,
        "Cartera de Servicios obtenida exitosamente",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/cartera/preview/{id}",
    params(("id" = String, Path, description = "Preview id")),
    responses((status = 200, description = "Staged extraction"), (status = 404, description = "Unknown preview"))
)]
pub async fn preview_cartera(
    ApiPath(preview_id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PreviewResponse<StagedUpload>>> {
    let staged = state
        .import_service
        .preview(UploadKind::Cartera, &preview_id)
        .await?;
    Ok(Json(PreviewResponse {
        preview_id,
        data: staged,
        message: "Vista previa Cartera de Servicios obtenida exitosamente".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/cartera/commit/{id}",
    params(("id" = String, Path, description = "Preview id")),
    responses((status = 200, description = "Service portfolio replaced"), (status = 404, description = "Unknown preview"))
)]
pub async fn commit_cartera(
    ApiPath(preview_id): ApiPath<String>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<CommitResponse<CarteraImportResult>>> {
    access::ensure_planning_manager(&user)?;
    let result = state.import_service.commit_cartera(&preview_id).await?;
    tracing::info!(
        "User {} committed cartera preview {} ({} rows)",
        user.email,
        preview_id,
        result.stored_count
    );
    Ok(Json(CommitResponse {
        preview_id,
        result,
        message: "Datos de Cartera de Servicios comprometidos exitosamente".to_string(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cartera", get(list_cartera).post(upload_cartera))
        .route("/cartera/preview/{id}", get(preview_cartera))
        .route("/cartera/commit/{id}", post(commit_cartera))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}
