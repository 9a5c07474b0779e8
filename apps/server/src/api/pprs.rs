use std::sync::Arc;

use crate::{
    auth::CurrentUser,
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    main_lib::AppState,
    models::{DataResponse, DeletedResponse, MessageResponse, YearQuery},
};
use axum::{
    extract::State,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use monitor_ppr_core::{
    cartera::CarteraPprCreation,
    pprs::{NewPpr, Ppr, PprDetail, PprStructure, Product},
    users::access,
};

#[utoipa::path(
    get,
    path = "/api/v1/pprs",
    responses((status = 200, description = "All PPRs"))
)]
pub async fn list_pprs(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DataResponse<Vec<Ppr>>>> {
    let pprs = state.ppr_service.list_pprs()?;
    Ok(Json(DataResponse::new(pprs, "PPRs obtenidos exitosamente")))
}

#[utoipa::path(
    get,
    path = "/api/v1/pprs/{id}",
    params(("id" = i32, Path, description = "PPR id")),
    responses((status = 200, description = "The PPR"), (status = 404, description = "PPR not found"))
)]
pub async fn get_ppr(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DataResponse<Ppr>>> {
    let ppr = state.ppr_service.get_ppr(id)?;
    Ok(Json(DataResponse::new(ppr, "PPR obtenido exitosamente")))
}

#[utoipa::path(
    post,
    path = "/api/v1/pprs",
    responses((status = 200, description = "The created PPR"), (status = 400, description = "Code already used for that year"))
)]
pub async fn create_ppr(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<NewPpr>,
) -> ApiResult<Json<DataResponse<Ppr>>> {
    access::ensure_ppr_manager(&actor)?;
    let ppr = state.ppr_service.create_ppr(payload).await?;
    tracing::info!("User {} created PPR {} ({})", actor.email, ppr.code, ppr.year);
    Ok(Json(DataResponse::new(ppr, "PPR creado exitosamente")))
}

#[utoipa::path(
    put,
    path = "/api/v1/pprs/{id}",
    params(("id" = i32, Path, description = "PPR id")),
    responses((status = 200, description = "The updated PPR"), (status = 404, description = "PPR not found"))
)]
pub async fn update_ppr(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<NewPpr>,
) -> ApiResult<Json<DataResponse<Ppr>>> {
    access::ensure_ppr_manager(&actor)?;
    let ppr = state.ppr_service.update_ppr(id, payload).await?;
    Ok(Json(DataResponse::new(ppr, "PPR actualizado exitosamente")))
}

#[utoipa::path(
    delete,
    path = "/api/v1/pprs/{id}",
    params(("id" = i32, Path, description = "PPR id")),
    responses((status = 200, body = MessageResponse), (status = 404, description = "PPR not found"))
)]
pub async fn delete_ppr(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> ApiResult<Json<MessageResponse>> {
    access::ensure_ppr_manager(&actor)?;
    state.ppr_service.delete_ppr(id).await?;
    tracing::info!("User {} deleted PPR {}", actor.email, id);
    Ok(Json(MessageResponse::new("PPR eliminado exitosamente")))
}

#[utoipa::path(
    get,
    path = "/api/v1/pprs/{id}/productos",
    params(("id" = i32, Path, description = "PPR id")),
    responses((status = 200, description = "Products of the PPR"))
)]
pub async fn get_products(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DataResponse<Vec<Product>>>> {
    let products = state.ppr_service.get_products(id)?;
    Ok(Json(DataResponse::new(
        products,
        "Productos obtenidos exitosamente",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/pprs/{id}/detalle",
    params(("id" = i32, Path, description = "PPR id")),
    responses((status = 200, description = "PPR with its product tree"))
)]
pub async fn get_detail(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DataResponse<PprDetail>>> {
    let detail = state.ppr_service.get_detail(id)?;
    Ok(Json(DataResponse::new(
        detail,
        "Detalle del PPR obtenido exitosamente",
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/pprs/{id}/estructura",
    params(("id" = i32, Path, description = "PPR id")),
    responses((status = 200, description = "Product tree with PPR and CEPLAN schedules"))
)]
pub async fn get_structure(
    ApiPath(id): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DataResponse<PprStructure>>> {
    let structure = state.ppr_service.get_structure(id)?;
    Ok(Json(DataResponse::new(
        structure,
        "Estructura del PPR obtenida exitosamente",
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/pprs/create-from-cartera",
    params(YearQuery),
    responses((status = 200, description = "PPRs created from the service portfolio"))
)]
pub async fn create_from_cartera(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    ApiQuery(query): ApiQuery<YearQuery>,
) -> ApiResult<Json<DataResponse<CarteraPprCreation>>> {
    access::ensure_ppr_manager(&actor)?;
    let year = query.year_or_current();
    let creation = state.cartera_service.create_pprs_from_cartera(year).await?;
    tracing::info!(
        "User {} created {} PPRs with {} sub-products from the service portfolio",
        actor.email,
        creation.total_pprs,
        creation.total_sub_products
    );
    let message = format!(
        "Se crearon exitosamente {} PPR(s) a partir de los registros de Cartera de Servicios para el año {}",
        creation.total_pprs, year
    );
    Ok(Json(DataResponse::new(creation, message)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/pprs/year/{year}",
    params(("year" = i32, Path, description = "Fiscal year")),
    responses((status = 200, body = DeletedResponse), (status = 403, description = "Administrators only"))
)]
pub async fn delete_by_year(
    ApiPath(year): ApiPath<i32>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
) -> ApiResult<Json<DeletedResponse>> {
    access::ensure_admin(&actor)?;
    let deleted = state.ppr_service.delete_by_year(year).await?;
    tracing::warn!("User {} deleted {} PPRs of {}", actor.email, deleted, year);
    Ok(Json(DeletedResponse {
        message: format!("Se eliminaron {deleted} PPR(s) del año {year}"),
        deleted_count: deleted,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pprs", get(list_pprs).post(create_ppr))
        .route("/pprs/create-from-cartera", post(create_from_cartera))
        .route("/pprs/year/{year}", delete(delete_by_year))
        .route(
            "/pprs/{id}",
            get(get_ppr).put(update_ppr).delete(delete_ppr),
        )
        .route("/pprs/{id}/productos", get(get_products))
        .route("/pprs/{id}/detalle", get(get_detail))
        .route("/pprs/{id}/estructura", get(get_structure))
}
