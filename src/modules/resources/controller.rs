use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use praxeum_core::AppError;
use praxeum_models::ids::ResourceId;

use crate::middleware::auth::AuthUser;
use crate::modules::resources::model::{
    PaginatedResourcesResponse, Resource, ResourceFilterParams,
};
use crate::modules::resources::service::ResourceService;
use crate::state::AppState;

/// List resources
#[utoipa::path(
    get,
    path = "/api/resources",
    summary = "List resources",
    params(ResourceFilterParams),
    responses(
        (status = 200, description = "Paginated resources", body = PaginatedResourcesResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Resources",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_resources(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<ResourceFilterParams>,
) -> Result<Json<PaginatedResourcesResponse>, AppError> {
    let resources = ResourceService::list_resources(&state.db, filters).await?;

    Ok(Json(resources))
}

/// Get a resource by ID
#[utoipa::path(
    get,
    path = "/api/resources/{id}",
    summary = "Get resource by ID",
    params(
        ("id" = Uuid, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource details", body = Resource),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Resource not found")
    ),
    tag = "Resources",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_resource_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Resource>, AppError> {
    let resource = ResourceService::get_resource(&state.db, ResourceId::from(id)).await?;

    Ok(Json(resource))
}
