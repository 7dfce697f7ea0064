use chrono::Utc;
use metrics::counter;
use sqlx::{PgExecutor, PgPool};
use tracing::{instrument, warn};

use praxeum_core::{AppError, PaginationMeta};
use praxeum_models::enums::{AssignmentStatus, RequestKind, RequestStatus, SessionStatus, UserRole};
use praxeum_models::ids::{BranchId, ChangeRequestId, ClassId, ResourceId, TimeslotId, UserId};
use praxeum_models::classes::CourseClass;
use praxeum_models::resources::Resource;
use praxeum_models::timeslots::Timeslot;
use praxeum_models::users::User;

use crate::config::email::EmailConfig;
use crate::modules::assignments::service::AssignmentService;
use crate::modules::availability::service::AvailabilityService;
use crate::modules::requests::model::{
    ApproveChangeRequestDto, ChangeRequest, ChangeRequestFilterParams, ChangeRequestWithContext,
    DeclineSwapDto, PaginatedChangeRequestsResponse, RejectChangeRequestDto,
    SubmitChangeRequestDto,
};
use crate::modules::resources::service::ResourceService;
use crate::modules::sessions::service::SessionService;
use crate::utils::auth_helpers::{get_staff_user, get_user};
use crate::utils::email::EmailService;

const REQUEST_COLUMNS: &str = "id, teacher_id, session_id, kind, status, proposed_date, \
     proposed_timeslot_id, proposed_resource_id, replacement_teacher_id, new_session_id, \
     note, rejection_reason, decided_by, decided_at, created_at, updated_at";

pub struct ChangeRequestService;

impl ChangeRequestService {
    /// Create a PENDING change request on behalf of a teacher.
    ///
    /// The caller must be the session's active teacher, the session must be
    /// PLANNED, and the payload must match the request kind. Proposed
    /// resources and timeslots are validated against the session's branch at
    /// submission time; the availability check itself is deferred to
    /// approval, where it runs under the deciding transaction.
    #[instrument(skip(db))]
    pub async fn submit(
        db: &PgPool,
        teacher_id: UserId,
        dto: SubmitChangeRequestDto,
    ) -> Result<ChangeRequest, AppError> {
        let session = SessionService::get_session(db, dto.session_id).await?;

        if session.status != SessionStatus::Planned {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Only planned sessions can be changed; session is {}",
                session.status
            )));
        }

        if !AssignmentService::is_active_teacher(db, session.id, teacher_id).await? {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Only the session's active teacher can request a change"
            )));
        }

        let branch_id = Self::class_branch(db, session.class_id).await?;

        match dto.kind {
            RequestKind::Reschedule => {
                let date = dto.proposed_date.ok_or_else(|| {
                    AppError::bad_request(anyhow::anyhow!("Reschedule requires a proposed date"))
                })?;
                let timeslot_id = dto.proposed_timeslot_id.ok_or_else(|| {
                    AppError::bad_request(anyhow::anyhow!(
                        "Reschedule requires a proposed timeslot"
                    ))
                })?;
                let resource_id = dto.proposed_resource_id.ok_or_else(|| {
                    AppError::bad_request(anyhow::anyhow!(
                        "Reschedule requires a proposed resource"
                    ))
                })?;
                if dto.replacement_teacher_id.is_some() {
                    return Err(AppError::bad_request(anyhow::anyhow!(
                        "Reschedule does not take a replacement teacher"
                    )));
                }
                if date < Utc::now().date_naive() {
                    return Err(AppError::bad_request(anyhow::anyhow!(
                        "Proposed date is in the past"
                    )));
                }
                Self::validate_timeslot(db, timeslot_id, branch_id).await?;
                Self::validate_resource(db, resource_id, branch_id).await?;
            }
            RequestKind::ModalityChange => {
                let resource_id = dto.proposed_resource_id.ok_or_else(|| {
                    AppError::bad_request(anyhow::anyhow!(
                        "Modality change requires a proposed resource"
                    ))
                })?;
                if dto.proposed_date.is_some()
                    || dto.proposed_timeslot_id.is_some()
                    || dto.replacement_teacher_id.is_some()
                {
                    return Err(AppError::bad_request(anyhow::anyhow!(
                        "Modality change only takes a proposed resource"
                    )));
                }
                Self::validate_resource(db, resource_id, branch_id).await?;
            }
            RequestKind::Swap => {
                let replacement_id = dto.replacement_teacher_id.ok_or_else(|| {
                    AppError::bad_request(anyhow::anyhow!("Swap requires a replacement teacher"))
                })?;
                if dto.proposed_date.is_some()
                    || dto.proposed_timeslot_id.is_some()
                    || dto.proposed_resource_id.is_some()
                {
                    return Err(AppError::bad_request(anyhow::anyhow!(
                        "Swap only takes a replacement teacher"
                    )));
                }
                Self::validate_replacement(db, replacement_id, teacher_id).await?;
            }
        }

        let request = sqlx::query_as::<_, ChangeRequest>(&format!(
            r#"INSERT INTO change_requests
                (teacher_id, session_id, kind, proposed_date, proposed_timeslot_id,
                 proposed_resource_id, replacement_teacher_id, note)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {REQUEST_COLUMNS}"#
        ))
        .bind(teacher_id)
        .bind(session.id)
        .bind(dto.kind)
        .bind(dto.proposed_date)
        .bind(dto.proposed_timeslot_id)
        .bind(dto.proposed_resource_id)
        .bind(dto.replacement_teacher_id)
        .bind(&dto.note)
        .fetch_one(db)
        .await?;

        counter!("change_requests_submitted_total", "kind" => dto.kind.as_str()).increment(1);

        Ok(request)
    }

    /// Approve a PENDING request, dispatching on its kind.
    ///
    /// The whole decision is one transaction: the request row is locked, the
    /// conflict arbiter runs on the same connection, and a failed check
    /// aborts everything. The unique occupancy index remains the last word
    /// between two approvals racing for the same slot.
    ///
    /// Staff may override parts of the proposed payload via `dto` (e.g. a
    /// different room, or a fresh nominee after a declined swap).
    #[instrument(skip(db, email_config))]
    pub async fn approve(
        db: &PgPool,
        email_config: &EmailConfig,
        request_id: ChangeRequestId,
        decider_id: UserId,
        dto: ApproveChangeRequestDto,
    ) -> Result<ChangeRequest, AppError> {
        let decider = get_staff_user(db, decider_id).await?;

        let mut tx = db.begin().await?;

        let request = Self::get_request_for_update(&mut *tx, request_id).await?;
        if request.status != RequestStatus::Pending {
            return Err(AppError::state_conflict(anyhow::anyhow!(
                "Request is {} and can no longer be approved",
                request.status
            )));
        }

        let session = SessionService::get_session_for_update(&mut *tx, request.session_id).await?;
        if session.status != SessionStatus::Planned {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Target session is no longer planned"
            )));
        }
        let branch_id = Self::class_branch(&mut *tx, session.class_id).await?;

        let updated = match request.kind {
            RequestKind::Reschedule => {
                let date = dto
                    .proposed_date
                    .or(request.proposed_date)
                    .ok_or_else(|| {
                        AppError::bad_request(anyhow::anyhow!(
                            "Reschedule approval requires a proposed date"
                        ))
                    })?;
                let timeslot_id = dto
                    .proposed_timeslot_id
                    .or(request.proposed_timeslot_id)
                    .ok_or_else(|| {
                        AppError::bad_request(anyhow::anyhow!(
                            "Reschedule approval requires a proposed timeslot"
                        ))
                    })?;
                let resource_id = dto
                    .proposed_resource_id
                    .or(request.proposed_resource_id)
                    .ok_or_else(|| {
                        AppError::bad_request(anyhow::anyhow!(
                            "Reschedule approval requires a proposed resource"
                        ))
                    })?;

                Self::validate_timeslot(&mut *tx, timeslot_id, branch_id).await?;
                let resource = Self::validate_resource(&mut *tx, resource_id, branch_id).await?;

                AvailabilityService::ensure_available(
                    &mut *tx,
                    resource.id,
                    date,
                    timeslot_id,
                    Some(session.id),
                )
                .await?;

                // The old session must release its slot inside this
                // transaction before the replacement is inserted; the
                // occupancy index is not deferred.
                SessionService::cancel_session(&mut *tx, session.id).await?;
                let new_session = SessionService::create_session(
                    &mut *tx,
                    session.class_id,
                    date,
                    timeslot_id,
                    resource.id,
                    resource.kind.modality(),
                )
                .await?;
                AssignmentService::copy_to_session(&mut *tx, session.id, new_session.id).await?;

                sqlx::query_as::<_, ChangeRequest>(&format!(
                    r#"UPDATE change_requests
                       SET status = 'approved', proposed_date = $1, proposed_timeslot_id = $2,
                           proposed_resource_id = $3, new_session_id = $4,
                           note = COALESCE($5, note), decided_by = $6, decided_at = NOW(),
                           updated_at = NOW()
                       WHERE id = $7 AND status = 'pending'
                       RETURNING {REQUEST_COLUMNS}"#
                ))
                .bind(date)
                .bind(timeslot_id)
                .bind(resource.id)
                .bind(new_session.id)
                .bind(&dto.note)
                .bind(decider.id)
                .bind(request.id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(Self::concurrent_decision)?
            }
            RequestKind::ModalityChange => {
                let resource_id = dto
                    .proposed_resource_id
                    .or(request.proposed_resource_id)
                    .ok_or_else(|| {
                        AppError::bad_request(anyhow::anyhow!(
                            "Modality change approval requires a proposed resource"
                        ))
                    })?;

                let resource = Self::validate_resource(&mut *tx, resource_id, branch_id).await?;

                AvailabilityService::ensure_available(
                    &mut *tx,
                    resource.id,
                    session.session_date,
                    session.timeslot_id,
                    Some(session.id),
                )
                .await?;

                // Session identity, date, and timeslot stay; only the
                // resource link and per-session modality move. The class
                // level modality is deliberately left untouched.
                SessionService::reassign_resource(
                    &mut *tx,
                    &session,
                    resource.id,
                    resource.kind.modality(),
                )
                .await?;

                sqlx::query_as::<_, ChangeRequest>(&format!(
                    r#"UPDATE change_requests
                       SET status = 'approved', proposed_resource_id = $1,
                           note = COALESCE($2, note), decided_by = $3, decided_at = NOW(),
                           updated_at = NOW()
                       WHERE id = $4 AND status = 'pending'
                       RETURNING {REQUEST_COLUMNS}"#
                ))
                .bind(resource.id)
                .bind(&dto.note)
                .bind(decider.id)
                .bind(request.id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(Self::concurrent_decision)?
            }
            RequestKind::Swap => {
                // No availability check: the session keeps its slot. The
                // substitution itself is deferred until the nominee confirms.
                let replacement_id = dto
                    .replacement_teacher_id
                    .or(request.replacement_teacher_id)
                    .ok_or_else(|| {
                        AppError::bad_request(anyhow::anyhow!(
                            "Swap approval requires a replacement teacher"
                        ))
                    })?;

                Self::validate_replacement(&mut *tx, replacement_id, request.teacher_id).await?;

                sqlx::query_as::<_, ChangeRequest>(&format!(
                    r#"UPDATE change_requests
                       SET status = 'waiting_confirm', replacement_teacher_id = $1,
                           note = COALESCE($2, note), decided_by = $3, decided_at = NOW(),
                           updated_at = NOW()
                       WHERE id = $4 AND status = 'pending'
                       RETURNING {REQUEST_COLUMNS}"#
                ))
                .bind(replacement_id)
                .bind(&dto.note)
                .bind(decider.id)
                .bind(request.id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(Self::concurrent_decision)?
            }
        };

        tx.commit().await?;

        counter!("change_requests_approved_total", "kind" => updated.kind.as_str()).increment(1);

        match updated.status {
            RequestStatus::WaitingConfirm => {
                Self::spawn_swap_nomination(db.clone(), email_config.clone(), updated.clone());
            }
            RequestStatus::Approved => {
                Self::spawn_decision_notice(
                    db.clone(),
                    email_config.clone(),
                    updated.clone(),
                    true,
                    None,
                );
            }
            _ => {}
        }

        Ok(updated)
    }

    /// Reject a PENDING request with a reason.
    #[instrument(skip(db, email_config))]
    pub async fn reject(
        db: &PgPool,
        email_config: &EmailConfig,
        request_id: ChangeRequestId,
        decider_id: UserId,
        dto: RejectChangeRequestDto,
    ) -> Result<ChangeRequest, AppError> {
        let decider = get_staff_user(db, decider_id).await?;
        let request = Self::get_request(db, request_id).await?;

        let updated = sqlx::query_as::<_, ChangeRequest>(&format!(
            r#"UPDATE change_requests
               SET status = 'rejected', rejection_reason = $1, decided_by = $2,
                   decided_at = NOW(), updated_at = NOW()
               WHERE id = $3 AND status = 'pending'
               RETURNING {REQUEST_COLUMNS}"#
        ))
        .bind(&dto.reason)
        .bind(decider.id)
        .bind(request.id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            AppError::state_conflict(anyhow::anyhow!(
                "Request is {} and can no longer be rejected",
                request.status
            ))
        })?;

        counter!("change_requests_rejected_total", "kind" => updated.kind.as_str()).increment(1);

        Self::spawn_decision_notice(
            db.clone(),
            email_config.clone(),
            updated.clone(),
            false,
            Some(dto.reason),
        );

        Ok(updated)
    }

    /// The nominated replacement teacher accepts a swap. Only now does the
    /// substitution take effect: the requester's assignment goes ON_LEAVE and
    /// the nominee's is upserted as SUBSTITUTED, atomically with the final
    /// APPROVED transition.
    #[instrument(skip(db, email_config))]
    pub async fn confirm_swap(
        db: &PgPool,
        email_config: &EmailConfig,
        request_id: ChangeRequestId,
        caller_id: UserId,
    ) -> Result<ChangeRequest, AppError> {
        let mut tx = db.begin().await?;

        let request = Self::get_request_for_update(&mut *tx, request_id).await?;
        if request.status != RequestStatus::WaitingConfirm {
            return Err(AppError::state_conflict(anyhow::anyhow!(
                "Request is {} and is not awaiting confirmation",
                request.status
            )));
        }

        let nominee_id = request.replacement_teacher_id.ok_or_else(|| {
            AppError::internal(anyhow::anyhow!("Swap awaiting confirmation has no nominee"))
        })?;
        if nominee_id != caller_id {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Only the nominated replacement teacher can confirm this swap"
            )));
        }

        AssignmentService::upsert(
            &mut *tx,
            request.session_id,
            request.teacher_id,
            AssignmentStatus::OnLeave,
        )
        .await?;
        AssignmentService::upsert(
            &mut *tx,
            request.session_id,
            nominee_id,
            AssignmentStatus::Substituted,
        )
        .await?;

        let updated = sqlx::query_as::<_, ChangeRequest>(&format!(
            r#"UPDATE change_requests
               SET status = 'approved', decided_at = NOW(), updated_at = NOW()
               WHERE id = $1 AND status = 'waiting_confirm'
               RETURNING {REQUEST_COLUMNS}"#
        ))
        .bind(request.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(Self::concurrent_decision)?;

        tx.commit().await?;

        counter!("change_requests_swaps_confirmed_total").increment(1);

        Self::spawn_decision_notice(db.clone(), email_config.clone(), updated.clone(), true, None);

        Ok(updated)
    }

    /// The nominated replacement teacher declines a swap. The nomination is
    /// cleared, a machine-readable marker is appended to the note, and the
    /// request returns to PENDING so staff can re-decide (e.g. nominate
    /// someone else).
    #[instrument(skip(db))]
    pub async fn decline_swap(
        db: &PgPool,
        request_id: ChangeRequestId,
        caller_id: UserId,
        dto: DeclineSwapDto,
    ) -> Result<ChangeRequest, AppError> {
        let mut tx = db.begin().await?;

        let request = Self::get_request_for_update(&mut *tx, request_id).await?;
        if request.status != RequestStatus::WaitingConfirm {
            return Err(AppError::state_conflict(anyhow::anyhow!(
                "Request is {} and is not awaiting confirmation",
                request.status
            )));
        }

        let nominee_id = request.replacement_teacher_id.ok_or_else(|| {
            AppError::internal(anyhow::anyhow!("Swap awaiting confirmation has no nominee"))
        })?;
        if nominee_id != caller_id {
            return Err(AppError::forbidden(anyhow::anyhow!(
                "Only the nominated replacement teacher can decline this swap"
            )));
        }

        let marker = ChangeRequest::decline_marker(caller_id, &dto.reason);
        let note = match &request.note {
            Some(existing) => format!("{existing} {marker}"),
            None => marker,
        };

        let updated = sqlx::query_as::<_, ChangeRequest>(&format!(
            r#"UPDATE change_requests
               SET status = 'pending', replacement_teacher_id = NULL, note = $1,
                   decided_by = NULL, decided_at = NULL, updated_at = NOW()
               WHERE id = $2 AND status = 'waiting_confirm'
               RETURNING {REQUEST_COLUMNS}"#
        ))
        .bind(&note)
        .bind(request.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(Self::concurrent_decision)?;

        tx.commit().await?;

        counter!("change_requests_swaps_declined_total").increment(1);

        Ok(updated)
    }

    /// Paginated request listing with teacher/session/status/kind filters.
    /// Read-only; used by the staff and teacher UIs.
    #[instrument(skip(db))]
    pub async fn list_requests(
        db: &PgPool,
        filters: ChangeRequestFilterParams,
    ) -> Result<PaginatedChangeRequestsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut where_clause = String::new();
        if let Some(teacher_id) = filters.teacher_id {
            where_clause.push_str(&format!(" AND teacher_id = '{}'", teacher_id));
        }
        if let Some(session_id) = filters.session_id {
            where_clause.push_str(&format!(" AND session_id = '{}'", session_id));
        }
        if let Some(status) = filters.status {
            where_clause.push_str(&format!(" AND status = '{}'", status));
        }
        if let Some(kind) = filters.kind {
            where_clause.push_str(&format!(" AND kind = '{}'", kind));
        }

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM change_requests WHERE TRUE{where_clause}"
        ))
        .fetch_one(db)
        .await?;

        let requests = sqlx::query_as::<_, ChangeRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM change_requests WHERE TRUE{where_clause} \
             ORDER BY created_at DESC LIMIT {limit} OFFSET {offset}"
        ))
        .fetch_all(db)
        .await?;

        let has_more = offset + limit < total;

        Ok(PaginatedChangeRequestsResponse {
            data: requests,
            meta: PaginationMeta {
                total,
                limit,
                offset: Some(offset),
                page: None,
                has_more,
            },
        })
    }

    /// Fetch a request joined with requester, session, and nominee context.
    #[instrument(skip(db))]
    pub async fn get_request_with_context(
        db: &PgPool,
        request_id: ChangeRequestId,
    ) -> Result<ChangeRequestWithContext, AppError> {
        sqlx::query_as::<_, ChangeRequestWithContext>(
            r#"SELECT
                cr.id,
                cr.teacher_id,
                u.first_name || ' ' || u.last_name AS teacher_name,
                cr.session_id,
                s.session_date,
                t.name AS timeslot_name,
                c.name AS class_name,
                cr.kind,
                cr.status,
                cr.proposed_date,
                cr.proposed_timeslot_id,
                cr.proposed_resource_id,
                cr.replacement_teacher_id,
                r.first_name || ' ' || r.last_name AS replacement_teacher_name,
                cr.new_session_id,
                cr.note,
                cr.rejection_reason,
                cr.decided_by,
                cr.decided_at,
                cr.created_at,
                cr.updated_at
               FROM change_requests cr
               JOIN users u ON u.id = cr.teacher_id
               JOIN class_sessions s ON s.id = cr.session_id
               JOIN timeslots t ON t.id = s.timeslot_id
               JOIN course_classes c ON c.id = s.class_id
               LEFT JOIN users r ON r.id = cr.replacement_teacher_id
               WHERE cr.id = $1"#,
        )
        .bind(request_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Change request not found")))
    }

    /// Fetch a request by ID.
    pub async fn get_request<'e, E>(
        executor: E,
        request_id: ChangeRequestId,
    ) -> Result<ChangeRequest, AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, ChangeRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM change_requests WHERE id = $1"
        ))
        .bind(request_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Change request not found")))
    }

    async fn get_request_for_update<'e, E>(
        executor: E,
        request_id: ChangeRequestId,
    ) -> Result<ChangeRequest, AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, ChangeRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM change_requests WHERE id = $1 FOR UPDATE"
        ))
        .bind(request_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Change request not found")))
    }

    fn concurrent_decision() -> AppError {
        AppError::state_conflict(anyhow::anyhow!("Request was decided concurrently"))
    }

    async fn class_branch<'e, E>(executor: E, class_id: ClassId) -> Result<BranchId, AppError>
    where
        E: PgExecutor<'e>,
    {
        let class = sqlx::query_as::<_, CourseClass>(
            "SELECT id, branch_id, name, modality, created_at, updated_at FROM course_classes WHERE id = $1",
        )
        .bind(class_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))?;

        Ok(class.branch_id)
    }

    /// A proposed resource must resolve, be active, and belong to the same
    /// branch as the session's class.
    async fn validate_resource<'e, E>(
        executor: E,
        resource_id: ResourceId,
        branch_id: BranchId,
    ) -> Result<Resource, AppError>
    where
        E: PgExecutor<'e>,
    {
        let resource = ResourceService::get_resource(executor, resource_id).await?;
        if !resource.is_active {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Resource {} is not active",
                resource.name
            )));
        }
        if resource.branch_id != branch_id {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Resource {} belongs to a different branch",
                resource.name
            )));
        }
        Ok(resource)
    }

    async fn validate_timeslot<'e, E>(
        executor: E,
        timeslot_id: TimeslotId,
        branch_id: BranchId,
    ) -> Result<Timeslot, AppError>
    where
        E: PgExecutor<'e>,
    {
        let timeslot = sqlx::query_as::<_, Timeslot>(
            "SELECT id, branch_id, name, start_time, end_time, created_at, updated_at FROM timeslots WHERE id = $1",
        )
        .bind(timeslot_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Timeslot not found")))?;

        if timeslot.branch_id != branch_id {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Timeslot {} belongs to a different branch",
                timeslot.name
            )));
        }
        Ok(timeslot)
    }

    /// A swap nominee must resolve, hold the teacher role, and differ from
    /// the requesting teacher.
    async fn validate_replacement<'e, E>(
        executor: E,
        replacement_id: UserId,
        requester_id: UserId,
    ) -> Result<User, AppError>
    where
        E: PgExecutor<'e>,
    {
        if replacement_id == requester_id {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Replacement teacher must differ from the requesting teacher"
            )));
        }

        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, first_name, last_name, email, role, branch_id, created_at, updated_at
               FROM users WHERE id = $1"#,
        )
        .bind(replacement_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Replacement teacher not found")))?;

        if user.role != UserRole::Teacher {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Nominated replacement must be a teacher"
            )));
        }

        Ok(user)
    }

    // Notifications are fire-and-forget: transitions never depend on them.

    fn spawn_decision_notice(
        db: PgPool,
        email_config: EmailConfig,
        request: ChangeRequest,
        approved: bool,
        reason: Option<String>,
    ) {
        if !email_config.enabled {
            return;
        }
        tokio::spawn(async move {
            let teacher = match get_user(&db, request.teacher_id).await {
                Ok(user) => user,
                Err(e) => {
                    warn!(error = %e.error, "Failed to load requester for decision notice");
                    return;
                }
            };

            let service = EmailService::new(email_config);
            if let Err(e) = service
                .send_decision_notice(
                    &teacher.email,
                    &teacher.full_name(),
                    request.kind,
                    approved,
                    reason.as_deref(),
                )
                .await
            {
                warn!(error = %e.error, "Failed to send decision notice");
            }
        });
    }

    fn spawn_swap_nomination(db: PgPool, email_config: EmailConfig, request: ChangeRequest) {
        if !email_config.enabled {
            return;
        }
        tokio::spawn(async move {
            let Some(nominee_id) = request.replacement_teacher_id else {
                return;
            };

            let nominee = match get_user(&db, nominee_id).await {
                Ok(user) => user,
                Err(e) => {
                    warn!(error = %e.error, "Failed to load nominee for swap notice");
                    return;
                }
            };
            let session = match SessionService::get_session_with_context(&db, request.session_id)
                .await
            {
                Ok(session) => session,
                Err(e) => {
                    warn!(error = %e.error, "Failed to load session for swap notice");
                    return;
                }
            };

            let service = EmailService::new(email_config);
            if let Err(e) = service
                .send_swap_nomination(
                    &nominee.email,
                    &nominee.full_name(),
                    &session.class_name,
                    &session.session_date.to_string(),
                )
                .await
            {
                warn!(error = %e.error, "Failed to send swap nomination notice");
            }
        });
    }
}
