use std::sync::Arc;

use crate::{
    auth::CurrentUser,
    error::ApiResult,
    extract::ApiJson,
    main_lib::AppState,
    models::{LoginRequest, LoginResponse, MessageResponse, UserResponse},
};
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use monitor_ppr_core::users::{access, NewUser};

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, body = LoginResponse),
        (status = 401, description = "Unknown email or wrong password"),
        (status = 400, description = "Inactive account")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .user_service
        .authenticate(&payload.email, &payload.password)?;
    let token = state.auth.issue_token(user.id)?;
    tracing::info!("User {} logged in", user.email);
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        expires_in: state.auth.expires_in().as_secs(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    responses((status = 200, body = UserResponse), (status = 403, description = "Administrators only"))
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<NewUser>,
) -> ApiResult<Json<UserResponse>> {
    access::ensure_admin(&actor)?;
    let created = state.user_service.create_user(payload).await?;
    tracing::info!("User {} registered {}", actor.email, created.email);
    Ok(Json(UserResponse::from(created)))
}

#[utoipa::path(get, path = "/api/v1/auth/me", responses((status = 200, body = UserResponse)))]
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// Tokens are stateless; logging out is the client dropping its token.
#[utoipa::path(post, path = "/api/v1/auth/logout", responses((status = 200, body = MessageResponse)))]
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Sesión cerrada exitosamente"))
}

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new().route("/auth/login", post(login))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}
