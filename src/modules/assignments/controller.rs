use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use praxeum_core::AppError;
use praxeum_models::ids::SessionId;

use crate::middleware::auth::AuthUser;
use crate::modules::assignments::model::AssignmentWithTeacher;
use crate::modules::assignments::service::AssignmentService;
use crate::modules::sessions::service::SessionService;
use crate::state::AppState;

/// List teaching assignments for a session
#[utoipa::path(
    get,
    path = "/api/sessions/{session_id}/assignments",
    summary = "List session assignments",
    params(
        ("session_id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Assignments for the session", body = Vec<AssignmentWithTeacher>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Session not found")
    ),
    tag = "Sessions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_session_assignments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<AssignmentWithTeacher>>, AppError> {
    let session_id = SessionId::from(session_id);

    // 404 on a dangling session id rather than an empty list.
    SessionService::get_session(&state.db, session_id).await?;

    let assignments = AssignmentService::list_for_session(&state.db, session_id).await?;

    Ok(Json(assignments))
}
