use std::sync::Arc;

use crate::{
    auth::CurrentUser,
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    main_lib::AppState,
    models::MessageResponse,
};
use axum::{
    extract::State,
    routing::{get, put},
    Extension, Json, Router,
};
use monitor_ppr_core::{
    dashboard::{DashboardMetrics, PprProgressSummary, ScheduleFilter, SubProductProgress},
    pprs::Ppr,
    schedules::{MonthSnapshot, ProgressUpdate},
    users::access,
};

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/pprs-assigned",
    responses((status = 200, description = "PPRs visible to the caller"))
)]
pub async fn assigned_pprs(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Ppr>>> {
    Ok(Json(state.dashboard_service.assigned_pprs(&user)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/assigned-pprs-summary",
    responses((status = 200, description = "Progress per visible PPR"))
)]
pub async fn assigned_summary(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<PprProgressSummary>>> {
    Ok(Json(state.dashboard_service.assigned_summary(&user)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/ppr/metrics",
    params(
        ("month" = Option<u32>, Query, description = "Month 1-12"),
        ("year" = Option<i32>, Query, description = "Fiscal year")
    ),
    responses((status = 200, description = "Aggregated metrics"))
)]
pub async fn general_metrics(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiQuery(filter): ApiQuery<ScheduleFilter>,
) -> ApiResult<Json<DashboardMetrics>> {
    Ok(Json(state.dashboard_service.general_metrics(&user, filter)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/ppr/{id}/metrics",
    params(
        ("id" = i32, Path, description = "PPR id"),
        ("month" = Option<u32>, Query, description = "Month 1-12"),
        ("year" = Option<i32>, Query, description = "Fiscal year")
    ),
    responses((status = 200, description = "Metrics of one PPR"), (status = 403, description = "PPR not assigned to the caller"))
)]
pub async fn ppr_metrics(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiQuery(filter): ApiQuery<ScheduleFilter>,
) -> ApiResult<Json<DashboardMetrics>> {
    Ok(Json(state.dashboard_service.ppr_metrics(&user, id, filter)?))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/ppr/{id}/subproductos",
    params(
        ("id" = i32, Path, description = "PPR id"),
        ("month" = Option<u32>, Query, description = "Month 1-12"),
        ("year" = Option<i32>, Query, description = "Fiscal year")
    ),
    responses((status = 200, description = "Sub-product progress of one PPR"))
)]
pub async fn ppr_sub_products(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiQuery(filter): ApiQuery<ScheduleFilter>,
) -> ApiResult<Json<Vec<SubProductProgress>>> {
    Ok(Json(
        state.dashboard_service.ppr_sub_products(&user, id, filter)?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/subproductos",
    responses((status = 200, description = "Sub-product progress across visible PPRs"))
)]
pub async fn all_sub_products(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<SubProductProgress>>> {
    Ok(Json(state.dashboard_service.all_sub_products(&user)?))
}

/// `id` names the sub-product whose monthly progress changes.
#[utoipa::path(
    put,
    path = "/api/v1/dashboard/ppr/{id}/update-avance",
    params(("id" = i32, Path, description = "Sub-product id")),
    responses((status = 200, body = MessageResponse), (status = 404, description = "No schedule for that sub-product and year"))
)]
pub async fn update_progress(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<ProgressUpdate>,
) -> ApiResult<Json<MessageResponse>> {
    access::ensure_ppr_manager(&user)?;
    state.schedule_service.update_progress(id, payload).await?;
    tracing::info!("User {} updated progress of sub-product {}", user.email, id);
    Ok(Json(MessageResponse::new(
        "Programación actualizada exitosamente",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/ppr/{id}/programacion-multi-month",
    params(("id" = i32, Path, description = "Sub-product id")),
    responses((status = 200, description = "Previous, current and next month"))
)]
pub async fn recent_months(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<MonthSnapshot>>> {
    let today = chrono::Local::now().date_naive();
    Ok(Json(state.schedule_service.recent_months(id, today)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard/pprs-assigned", get(assigned_pprs))
        .route("/dashboard/assigned-pprs-summary", get(assigned_summary))
        .route("/dashboard/ppr/metrics", get(general_metrics))
        .route("/dashboard/ppr/{id}/metrics", get(ppr_metrics))
        .route("/dashboard/ppr/{id}/subproductos", get(ppr_sub_products))
        .route("/dashboard/subproductos", get(all_sub_products))
        .route("/dashboard/ppr/{id}/update-avance", put(update_progress))
        .route(
            "/dashboard/ppr/{id}/programacion-multi-month",
            get(recent_months),
        )
}
