use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use praxeum_core::AppError;
use praxeum_models::ids::ChangeRequestId;

use crate::middleware::auth::{AuthUser, RequireStaff, RequireTeacher};
use crate::modules::requests::model::{
    ApproveChangeRequestDto, ChangeRequest, ChangeRequestFilterParams, ChangeRequestWithContext,
    DeclineSwapDto, PaginatedChangeRequestsResponse, RejectChangeRequestDto,
    SubmitChangeRequestDto,
};
use crate::modules::requests::service::ChangeRequestService;
use crate::state::AppState;

/// Submit a schedule-change request
#[utoipa::path(
    post,
    path = "/api/requests",
    summary = "Submit change request",
    request_body = SubmitChangeRequestDto,
    responses(
        (status = 201, description = "Request created", body = ChangeRequest),
        (status = 400, description = "Payload inconsistent with request kind"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the session's active teacher"),
        (status = 404, description = "Session not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Change Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn submit_request(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    Json(dto): Json<SubmitChangeRequestDto>,
) -> Result<(StatusCode, Json<ChangeRequest>), AppError> {
    dto.validate().map_err(AppError::validation)?;

    let teacher_id = auth_user.user_id()?;
    let request = ChangeRequestService::submit(&state.db, teacher_id, dto).await?;

    Ok((StatusCode::CREATED, Json(request)))
}

/// List change requests (staff view)
#[utoipa::path(
    get,
    path = "/api/requests",
    summary = "List change requests",
    params(ChangeRequestFilterParams),
    responses(
        (status = 200, description = "Paginated change requests", body = PaginatedChangeRequestsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - staff only")
    ),
    tag = "Change Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_requests(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    Query(filters): Query<ChangeRequestFilterParams>,
) -> Result<Json<PaginatedChangeRequestsResponse>, AppError> {
    let requests = ChangeRequestService::list_requests(&state.db, filters).await?;

    Ok(Json(requests))
}

/// List the calling teacher's own change requests
#[utoipa::path(
    get,
    path = "/api/requests/mine",
    summary = "List my change requests",
    params(ChangeRequestFilterParams),
    responses(
        (status = 200, description = "Paginated change requests", body = PaginatedChangeRequestsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - teachers only")
    ),
    tag = "Change Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_my_requests(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    Query(mut filters): Query<ChangeRequestFilterParams>,
) -> Result<Json<PaginatedChangeRequestsResponse>, AppError> {
    filters.teacher_id = Some(auth_user.user_id()?);
    let requests = ChangeRequestService::list_requests(&state.db, filters).await?;

    Ok(Json(requests))
}

/// Get a change request by ID
#[utoipa::path(
    get,
    path = "/api/requests/{id}",
    summary = "Get change request by ID",
    params(
        ("id" = Uuid, Path, description = "Change request ID")
    ),
    responses(
        (status = 200, description = "Request with context", body = ChangeRequestWithContext),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - not a participant"),
        (status = 404, description = "Request not found")
    ),
    tag = "Change Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_request_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ChangeRequestWithContext>, AppError> {
    let request =
        ChangeRequestService::get_request_with_context(&state.db, ChangeRequestId::from(id))
            .await?;

    // Staff see everything; teachers only requests they participate in.
    let caller_id = auth_user.user_id()?;
    if !auth_user.is_staff()
        && request.teacher_id != caller_id
        && request.replacement_teacher_id != Some(caller_id)
    {
        return Err(AppError::forbidden(anyhow::anyhow!(
            "Not a participant in this change request"
        )));
    }

    Ok(Json(request))
}

/// Approve a pending change request
#[utoipa::path(
    post,
    path = "/api/requests/{id}/approve",
    summary = "Approve change request",
    params(
        ("id" = Uuid, Path, description = "Change request ID")
    ),
    request_body = ApproveChangeRequestDto,
    responses(
        (status = 200, description = "Request approved (or moved to waiting_confirm for swaps)", body = ChangeRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - staff only"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Already decided, or target resource occupied")
    ),
    tag = "Change Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn approve_request(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(id): Path<Uuid>,
    body: Option<Json<ApproveChangeRequestDto>>,
) -> Result<Json<ChangeRequest>, AppError> {
    let dto = body.map(|Json(dto)| dto).unwrap_or_default();
    dto.validate().map_err(AppError::validation)?;

    let request = ChangeRequestService::approve(
        &state.db,
        &state.email_config,
        ChangeRequestId::from(id),
        auth_user.user_id()?,
        dto,
    )
    .await?;

    Ok(Json(request))
}

/// Reject a pending change request
#[utoipa::path(
    post,
    path = "/api/requests/{id}/reject",
    summary = "Reject change request",
    params(
        ("id" = Uuid, Path, description = "Change request ID")
    ),
    request_body = RejectChangeRequestDto,
    responses(
        (status = 200, description = "Request rejected", body = ChangeRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - staff only"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already decided")
    ),
    tag = "Change Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn reject_request(
    State(state): State<AppState>,
    RequireStaff(auth_user): RequireStaff,
    Path(id): Path<Uuid>,
    Json(dto): Json<RejectChangeRequestDto>,
) -> Result<Json<ChangeRequest>, AppError> {
    dto.validate().map_err(AppError::validation)?;

    let request = ChangeRequestService::reject(
        &state.db,
        &state.email_config,
        ChangeRequestId::from(id),
        auth_user.user_id()?,
        dto,
    )
    .await?;

    Ok(Json(request))
}

/// Confirm a swap as the nominated replacement teacher
#[utoipa::path(
    post,
    path = "/api/requests/{id}/confirm",
    summary = "Confirm swap",
    params(
        ("id" = Uuid, Path, description = "Change request ID")
    ),
    responses(
        (status = 200, description = "Swap confirmed, substitution applied", body = ChangeRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - nominee only"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request not awaiting confirmation")
    ),
    tag = "Change Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn confirm_swap(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    Path(id): Path<Uuid>,
) -> Result<Json<ChangeRequest>, AppError> {
    let request = ChangeRequestService::confirm_swap(
        &state.db,
        &state.email_config,
        ChangeRequestId::from(id),
        auth_user.user_id()?,
    )
    .await?;

    Ok(Json(request))
}

/// Decline a swap as the nominated replacement teacher
#[utoipa::path(
    post,
    path = "/api/requests/{id}/decline",
    summary = "Decline swap",
    params(
        ("id" = Uuid, Path, description = "Change request ID")
    ),
    request_body = DeclineSwapDto,
    responses(
        (status = 200, description = "Swap declined, request back to pending", body = ChangeRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - nominee only"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request not awaiting confirmation")
    ),
    tag = "Change Requests",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn decline_swap(
    State(state): State<AppState>,
    RequireTeacher(auth_user): RequireTeacher,
    Path(id): Path<Uuid>,
    Json(dto): Json<DeclineSwapDto>,
) -> Result<Json<ChangeRequest>, AppError> {
    dto.validate().map_err(AppError::validation)?;

    let request = ChangeRequestService::decline_swap(
        &state.db,
        ChangeRequestId::from(id),
        auth_user.user_id()?,
        dto,
    )
    .await?;

    Ok(Json(request))
}
