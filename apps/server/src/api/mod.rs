use std::sync::Arc;

use crate::{auth::require_jwt, config::Config, main_lib::AppState};
use axum::{middleware, routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

mod assignments;
mod auth;
mod cartera;
mod comparison;
mod dashboard;
mod health;
mod pages;
mod pprs;
mod schedules;
mod uploads;
mod users;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        health::readyz,
        auth::login,
        auth::me,
        auth::logout,
        users::list_users,
        users::create_user,
        users::current_role,
        users::get_user,
        users::update_user,
        users::delete_user,
        users::change_password,
        auth::register,
        assignments::list_managers,
        assignments::ppr_managers,
        assignments::assign,
        assignments::unassign,
        pprs::list_pprs,
        pprs::create_ppr,
        pprs::create_from_cartera,
        pprs::delete_by_year,
        pprs::get_ppr,
        pprs::update_ppr,
        pprs::delete_ppr,
        pprs::get_products,
        pprs::get_detail,
        pprs::get_structure,
        uploads::upload_ppr,
        uploads::preview_ppr,
        uploads::commit_ppr,
        uploads::upload_ceplan,
        uploads::preview_ceplan,
        uploads::commit_ceplan,
        cartera::upload_cartera,
        cartera::list_cartera,
        cartera::preview_cartera,
        cartera::commit_cartera,
        comparison::compare,
        comparison::results,
        comparison::summary,
        dashboard::assigned_pprs,
        dashboard::assigned_summary,
        dashboard::general_metrics,
        dashboard::ppr_metrics,
        dashboard::ppr_sub_products,
        dashboard::all_sub_products,
        dashboard::update_progress,
        dashboard::recent_months,
        schedules::override_schedule,
    ),
    components(schemas(
        crate::models::UserResponse,
        crate::models::CurrentRoleResponse,
        crate::models::LoginRequest,
        crate::models::LoginResponse,
        crate::models::MessageResponse,
        crate::models::DeletedResponse,
    )),
    tags((name = "monitor-ppr"))
)]
pub struct ApiDoc;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any);
    }
    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_headers(Any)
        .allow_methods(Any)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();

    let public = Router::new()
        .merge(health::router())
        .merge(auth::public_router());

    let protected = Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(pprs::router())
        .merge(assignments::router())
        .merge(uploads::router())
        .merge(cartera::router())
        .merge(comparison::router())
        .merge(dashboard::router())
        .merge(schedules::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_jwt));

    Router::new()
        .nest("/api/v1", public.merge(protected))
        .route("/openapi.json", get(move || async move { Json(openapi) }))
        .merge(pages::router(&config.static_dir))
        .with_state(state)
        .layer(cors_layer(config))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
