use std::sync::Arc;

use crate::{
    auth::CurrentUser,
    error::ApiResult,
    extract::{ApiJson, ApiPath},
    main_lib::AppState,
    models::{CurrentRoleResponse, MessageResponse, UserResponse},
};
use axum::{
    extract::State,
    routing::{get, put},
    Extension, Json, Router,
};
use monitor_ppr_core::users::{access, NewUser, PasswordChange, UserUpdate};

#[utoipa::path(get, path = "/api/v1/users", responses((status = 200, body = [UserResponse])))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    access::ensure_admin(&actor)?;
    let users = state.user_service.list_users()?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(post, path = "/api/v1/users", responses((status = 200, body = UserResponse)))]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<NewUser>,
) -> ApiResult<Json<UserResponse>> {
    access::ensure_admin(&actor)?;
    let created = state.user_service.create_user(payload).await?;
    tracing::info!("User {} created account {}", actor.email, created.email);
    Ok(Json(UserResponse::from(created)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/current-role",
    responses((status = 200, body = CurrentRoleResponse))
)]
pub async fn current_role(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<CurrentRoleResponse> {
    Json(CurrentRoleResponse::from(&user))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses((status = 200, body = UserResponse))
)]
pub async fn get_user(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> ApiResult<Json<UserResponse>> {
    access::ensure_admin(&actor)?;
    Ok(Json(UserResponse::from(state.user_service.get_user(id)?)))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses((status = 200, body = UserResponse))
)]
pub async fn update_user(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<UserUpdate>,
) -> ApiResult<Json<UserResponse>> {
    access::ensure_admin(&actor)?;
    let updated = state.user_service.update_user(id, payload).await?;
    tracing::info!("User {} updated account {}", actor.email, updated.email);
    Ok(Json(UserResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses((status = 200, body = MessageResponse))
)]
pub async fn delete_user(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> ApiResult<Json<MessageResponse>> {
    access::ensure_admin(&actor)?;
    state.user_service.delete_user(id).await?;
    tracing::info!("User {} deleted account {}", actor.email, id);
    Ok(Json(MessageResponse::new("Usuario eliminado exitosamente")))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/password",
    params(("id" = i32, Path, description = "User id")),
    responses((status = 200, body = MessageResponse))
)]
pub async fn change_password(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<PasswordChange>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .user_service
        .change_password(&actor, id, payload)
        .await?;
    tracing::info!("User {} changed the password of account {}", actor.email, id);
    Ok(Json(MessageResponse::new("Contraseña actualizada exitosamente")))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/current-role", get(current_role))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{id}/password", put(change_password))
}
