use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use praxeum_core::AppError;
use praxeum_models::ids::SessionId;

use crate::middleware::auth::AuthUser;
use crate::modules::sessions::model::{
    PaginatedSessionsResponse, SessionFilterParams, SessionWithContext,
};
use crate::modules::sessions::service::SessionService;
use crate::state::AppState;

/// List sessions
#[utoipa::path(
    get,
    path = "/api/sessions",
    summary = "List sessions",
    params(SessionFilterParams),
    responses(
        (status = 200, description = "Paginated sessions", body = PaginatedSessionsResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Sessions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_sessions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<SessionFilterParams>,
) -> Result<Json<PaginatedSessionsResponse>, AppError> {
    let sessions = SessionService::list_sessions(&state.db, filters).await?;

    Ok(Json(sessions))
}

/// Get a session by ID
#[utoipa::path(
    get,
    path = "/api/sessions/{session_id}",
    summary = "Get session by ID",
    params(
        ("session_id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session details", body = SessionWithContext),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_session_by_id(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionWithContext>, AppError> {
    let session =
        SessionService::get_session_with_context(&state.db, SessionId::from(session_id)).await?;

    Ok(Json(session))
}
