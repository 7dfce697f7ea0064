use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use praxeum_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::availability::model::{
    AvailabilityQuery, AvailabilityResponse, OccupancyQuery, OccupiedSlot,
};
use crate::modules::availability::service::AvailabilityService;
use crate::state::AppState;

/// Check whether a resource is free at a date/timeslot
#[utoipa::path(
    get,
    path = "/api/availability/check",
    summary = "Check resource availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Availability result", body = AvailabilityResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Availability",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn check_availability(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let available = AvailabilityService::is_available(
        &state.db,
        query.resource_id,
        query.date,
        query.timeslot_id,
        query.exclude_session_id,
    )
    .await?;

    Ok(Json(AvailabilityResponse {
        resource_id: query.resource_id,
        date: query.date,
        timeslot_id: query.timeslot_id,
        available,
    }))
}

/// List occupied resource slots for a date
#[utoipa::path(
    get,
    path = "/api/availability/occupancy",
    summary = "List day occupancy",
    params(OccupancyQuery),
    responses(
        (status = 200, description = "Occupied slots", body = Vec<OccupiedSlot>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Availability",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_occupancy(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(query): Query<OccupancyQuery>,
) -> Result<Json<Vec<OccupiedSlot>>, AppError> {
    let slots = AvailabilityService::occupancy(&state.db, query).await?;

    Ok(Json(slots))
}
