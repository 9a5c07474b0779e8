use std::sync::Arc;

use crate::{
    auth::CurrentUser,
    error::ApiResult,
    extract::{ApiJson, ApiPath},
    main_lib::AppState,
    models::MessageResponse,
};
use axum::{
    extract::State,
    routing::put,
    Extension, Json, Router,
};
use monitor_ppr_core::{schedules::ScheduleOverrideRequest, users::access};

/// Overwrites the listed months; a sub-product without a schedule is left alone.
#[utoipa::path(
    put,
    path = "/api/v1/programacion/subproducto/{id}",
    params(("id" = i32, Path, description = "Sub-product id")),
    responses((status = 200, body = MessageResponse))
)]
pub async fn override_schedule(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<ScheduleOverrideRequest>,
) -> ApiResult<Json<MessageResponse>> {
    access::ensure_ppr_manager(&user)?;
    match state.schedule_service.override_schedule(id, payload).await? {
        Some(_) => tracing::info!("User {} edited the schedule of sub-product {}", user.email, id),
        None => tracing::debug!("Sub-product {} has no PPR schedule to edit", id),
    }
    Ok(Json(MessageResponse::new(
        "Programación del subproducto actualizada exitosamente.",
    )))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/programacion/subproducto/{id}", put(override_schedule))
}
