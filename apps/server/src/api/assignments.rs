use std::sync::Arc;

use crate::{
    auth::CurrentUser,
    error::ApiResult,
    extract::ApiPath,
    main_lib::AppState,
    models::{MessageResponse, UserResponse},
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use monitor_ppr_core::users::access;

#[utoipa::path(
    get,
    path = "/api/v1/asignaciones/responsables",
    responses((status = 200, body = [UserResponse]))
)]
pub async fn list_managers(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let managers = state.assignment_service.list_ppr_managers()?;
    Ok(Json(managers.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/asignaciones/ppr/{id}/responsables",
    params(("id" = i32, Path, description = "PPR id")),
    responses((status = 200, body = [UserResponse]), (status = 404, description = "PPR not found"))
)]
pub async fn ppr_managers(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let managers = state.assignment_service.managers_of(id)?;
    Ok(Json(managers.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/asignaciones/ppr/{id}/responsables/{user_id}",
    params(
        ("id" = i32, Path, description = "PPR id"),
        ("user_id" = i32, Path, description = "User id")
    ),
    responses((status = 201, body = MessageResponse), (status = 409, description = "Already assigned"))
)]
pub async fn assign(
    ApiPath((ppr_id, user_id)): ApiPath<(i32, i32)>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    access::ensure_admin(&actor)?;
    state.assignment_service.assign(ppr_id, user_id).await?;
    let user = state.user_service.get_user(user_id)?;
    let ppr = state.ppr_service.get_ppr(ppr_id)?;
    tracing::info!("User {} assigned {} to PPR {}", actor.email, user.email, ppr.code);
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!(
            "Usuario '{}' asignado al PPR '{}' exitosamente",
            user.name, ppr.name
        ))),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/asignaciones/ppr/{id}/responsables/{user_id}",
    params(
        ("id" = i32, Path, description = "PPR id"),
        ("user_id" = i32, Path, description = "User id")
    ),
    responses((status = 200, body = MessageResponse), (status = 404, description = "Not assigned"))
)]
pub async fn unassign(
    ApiPath((ppr_id, user_id)): ApiPath<(i32, i32)>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> ApiResult<Json<MessageResponse>> {
    access::ensure_admin(&actor)?;
    state.assignment_service.unassign(ppr_id, user_id).await?;
    let user = state.user_service.get_user(user_id)?;
    let ppr = state.ppr_service.get_ppr(ppr_id)?;
    tracing::info!("User {} removed {} from PPR {}", actor.email, user.email, ppr.code);
    Ok(Json(MessageResponse::new(format!(
        "Usuario '{}' retirado del PPR '{}' exitosamente",
        user.name, ppr.name
    ))))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/asignaciones/responsables", get(list_managers))
        .route("/asignaciones/ppr/{id}/responsables", get(ppr_managers))
        .route(
            "/asignaciones/ppr/{id}/responsables/{user_id}",
            post(assign).delete(unassign),
        )
}
