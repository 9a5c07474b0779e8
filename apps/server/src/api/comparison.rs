use std::sync::Arc;

use crate::{
    auth::CurrentUser, error::ApiResult, extract::ApiPath, main_lib::AppState,
    models::DataResponse,
};
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use monitor_ppr_core::{
    comparison::{ComparisonRow, ComparisonRun, ComparisonSummary},
    users::access,
};

#[utoipa::path(
    post,
    path = "/api/v1/comparison/ppr/{id}/compare",
    params(("id" = i32, Path, description = "PPR id")),
    responses((status = 200, description = "Differences recomputed"), (status = 404, description = "PPR not found"))
)]
pub async fn compare(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<ComparisonRun>> {
    access::ensure_planning_manager(&user)?;
    tracing::info!("User {} running comparison for PPR {}", user.email, id);
    let run = state.comparison_service.compare(id).await?;
    Ok(Json(run))
}

#[utoipa::path(
    get,
    path = "/api/v1/comparison/ppr/{id}/comparison-results",
    params(("id" = i32, Path, description = "PPR id")),
    responses((status = 200, description = "Stored differences with both schedules"))
)]
pub async fn results(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DataResponse<Vec<ComparisonRow>>>> {
    let rows = state.comparison_service.results(id)?;
    let total = rows.len();
    Ok(Json(DataResponse::counted(
        rows,
        total,
        "Resultados de comparación obtenidos exitosamente",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/comparison/ppr/{id}/comparison-summary",
    params(("id" = i32, Path, description = "PPR id")),
    responses((status = 200, description = "Difference counts by status"))
)]
pub async fn summary(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DataResponse<ComparisonSummary>>> {
    let summary = state.comparison_service.summary(id)?;
    Ok(Json(DataResponse::new(
        summary,
        "Resumen de comparación obtenido exitosamente",
    )))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/comparison/ppr/{id}/compare", post(compare))
        .route("/comparison/ppr/{id}/comparison-results", get(results))
        .route("/comparison/ppr/{id}/comparison-summary", get(summary))
}
