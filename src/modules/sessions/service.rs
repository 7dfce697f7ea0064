use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use praxeum_core::{AppError, PaginationMeta};
use praxeum_models::enums::Modality;
use praxeum_models::ids::{ClassId, ResourceId, SessionId, TimeslotId};

use crate::modules::sessions::model::{
    ClassSession, PaginatedSessionsResponse, SessionFilterParams, SessionWithContext,
};

const SESSION_COLUMNS: &str =
    "id, class_id, session_date, timeslot_id, resource_id, modality, status, created_at, updated_at";

pub struct SessionService;

impl SessionService {
    /// Fetch a session by ID.
    pub async fn get_session<'e, E>(executor: E, session_id: SessionId) -> Result<ClassSession, AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, ClassSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM class_sessions WHERE id = $1"
        ))
        .bind(session_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Session not found")))
    }

    /// Fetch a session by ID, locked for the caller's transaction so a
    /// concurrent approval cannot mutate it mid-decision.
    pub(crate) async fn get_session_for_update<'e, E>(
        executor: E,
        session_id: SessionId,
    ) -> Result<ClassSession, AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, ClassSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM class_sessions WHERE id = $1 FOR UPDATE"
        ))
        .bind(session_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Session not found")))
    }

    /// Fetch a session joined with class, branch, timeslot, and resource info.
    #[instrument(skip(db))]
    pub async fn get_session_with_context(
        db: &PgPool,
        session_id: SessionId,
    ) -> Result<SessionWithContext, AppError> {
        sqlx::query_as::<_, SessionWithContext>(
            r#"SELECT
                s.id,
                s.class_id,
                c.name AS class_name,
                c.branch_id,
                s.session_date,
                s.timeslot_id,
                t.name AS timeslot_name,
                s.resource_id,
                r.name AS resource_name,
                s.modality,
                s.status,
                s.created_at,
                s.updated_at
               FROM class_sessions s
               JOIN course_classes c ON c.id = s.class_id
               JOIN timeslots t ON t.id = s.timeslot_id
               LEFT JOIN resources r ON r.id = s.resource_id
               WHERE s.id = $1"#,
        )
        .bind(session_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Session not found")))
    }

    /// Paginated session listing with class/status/date-range filters.
    #[instrument(skip(db))]
    pub async fn list_sessions(
        db: &PgPool,
        filters: SessionFilterParams,
    ) -> Result<PaginatedSessionsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut where_clause = String::new();
        if let Some(class_id) = filters.class_id {
            where_clause.push_str(&format!(" AND s.class_id = '{}'", class_id));
        }
        if let Some(status) = filters.status {
            where_clause.push_str(&format!(" AND s.status = '{}'", status));
        }
        if let Some(from_date) = filters.from_date {
            where_clause.push_str(&format!(" AND s.session_date >= '{}'", from_date));
        }
        if let Some(to_date) = filters.to_date {
            where_clause.push_str(&format!(" AND s.session_date <= '{}'", to_date));
        }

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM class_sessions s WHERE TRUE{where_clause}"
        ))
        .fetch_one(db)
        .await?;

        let sessions = sqlx::query_as::<_, SessionWithContext>(&format!(
            r#"SELECT
                s.id,
                s.class_id,
                c.name AS class_name,
                c.branch_id,
                s.session_date,
                s.timeslot_id,
                t.name AS timeslot_name,
                s.resource_id,
                r.name AS resource_name,
                s.modality,
                s.status,
                s.created_at,
                s.updated_at
               FROM class_sessions s
               JOIN course_classes c ON c.id = s.class_id
               JOIN timeslots t ON t.id = s.timeslot_id
               LEFT JOIN resources r ON r.id = s.resource_id
               WHERE TRUE{where_clause}
               ORDER BY s.session_date, t.start_time
               LIMIT {limit} OFFSET {offset}"#
        ))
        .fetch_all(db)
        .await?;

        let has_more = offset + limit < total;

        Ok(PaginatedSessionsResponse {
            data: sessions,
            meta: PaginationMeta {
                total,
                limit,
                offset: Some(offset),
                page: None,
                has_more,
            },
        })
    }

    /// Inserts a new PLANNED session holding a resource. A unique-index
    /// violation means a concurrent writer reserved the slot first and is
    /// surfaced as a resource conflict. Workflow-internal.
    pub(crate) async fn create_session<'e, E>(
        executor: E,
        class_id: ClassId,
        session_date: NaiveDate,
        timeslot_id: TimeslotId,
        resource_id: ResourceId,
        modality: Modality,
    ) -> Result<ClassSession, AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, ClassSession>(&format!(
            r#"INSERT INTO class_sessions (class_id, session_date, timeslot_id, resource_id, modality, status)
               VALUES ($1, $2, $3, $4, $5, 'planned')
               RETURNING {SESSION_COLUMNS}"#
        ))
        .bind(class_id)
        .bind(session_date)
        .bind(timeslot_id)
        .bind(resource_id)
        .bind(modality)
        .fetch_one(executor)
        .await
        .map_err(|e| Self::map_occupancy_violation(e, resource_id, session_date, timeslot_id))
    }

    /// Cancels a session. Workflow-internal; the caller has already verified
    /// the session is PLANNED under its transaction.
    pub(crate) async fn cancel_session<'e, E>(
        executor: E,
        session_id: SessionId,
    ) -> Result<(), AppError>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE class_sessions SET status = 'cancelled', updated_at = NOW() WHERE id = $1 AND status = 'planned'",
        )
        .bind(session_id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::state_conflict(anyhow::anyhow!(
                "Session is no longer planned and cannot be cancelled"
            )));
        }

        Ok(())
    }

    /// Repoints a session at a different resource, updating its modality to
    /// match the resource kind. The session keeps its identity, date, and
    /// timeslot. Workflow-internal.
    pub(crate) async fn reassign_resource<'e, E>(
        executor: E,
        session: &ClassSession,
        resource_id: ResourceId,
        modality: Modality,
    ) -> Result<ClassSession, AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, ClassSession>(&format!(
            r#"UPDATE class_sessions
               SET resource_id = $1, modality = $2, updated_at = NOW()
               WHERE id = $3
               RETURNING {SESSION_COLUMNS}"#
        ))
        .bind(resource_id)
        .bind(modality)
        .bind(session.id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            Self::map_occupancy_violation(e, resource_id, session.session_date, session.timeslot_id)
        })
    }

    fn map_occupancy_violation(
        e: sqlx::Error,
        resource_id: ResourceId,
        session_date: NaiveDate,
        timeslot_id: TimeslotId,
    ) -> AppError {
        if let sqlx::Error::Database(db_err) = &e
            && db_err.is_unique_violation()
            && db_err.message().contains("unique_resource_occupancy")
        {
            return AppError::resource_conflict(anyhow::anyhow!(
                "Resource {} is already occupied on {} at timeslot {}",
                resource_id,
                session_date,
                timeslot_id
            ));
        }
        AppError::from(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_seed;
    use praxeum_core::{ErrorCode, PaginationParams};
    use praxeum_models::enums::SessionStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_session_rejects_occupied_slot(pool: PgPool) {
        let seeded = test_seed::seed_session(&pool, date(2030, 3, 4)).await;

        let err = SessionService::create_session(
            &pool,
            seeded.class_id,
            date(2030, 3, 4),
            seeded.timeslot_id,
            seeded.resource_id,
            Modality::InPerson,
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ResourceConflict);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_cancelled_slot_can_be_rebooked(pool: PgPool) {
        let seeded = test_seed::seed_session(&pool, date(2030, 3, 4)).await;

        SessionService::cancel_session(&pool, seeded.session_id)
            .await
            .unwrap();

        let session = SessionService::create_session(
            &pool,
            seeded.class_id,
            date(2030, 3, 4),
            seeded.timeslot_id,
            seeded.resource_id,
            Modality::InPerson,
        )
        .await
        .unwrap();

        assert_eq!(session.status, SessionStatus::Planned);
        assert_eq!(session.resource_id, Some(seeded.resource_id));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_cancel_twice_is_a_state_conflict(pool: PgPool) {
        let seeded = test_seed::seed_session(&pool, date(2030, 3, 4)).await;

        SessionService::cancel_session(&pool, seeded.session_id)
            .await
            .unwrap();
        let err = SessionService::cancel_session(&pool, seeded.session_id)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::StateConflict);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_sessions_filters_by_date_range(pool: PgPool) {
        let seeded = test_seed::seed_session(&pool, date(2030, 3, 4)).await;
        test_seed::create_session(
            &pool,
            seeded.class_id,
            date(2030, 4, 10),
            seeded.timeslot_id,
            None,
        )
        .await;

        let result = SessionService::list_sessions(
            &pool,
            SessionFilterParams {
                class_id: Some(seeded.class_id),
                status: None,
                from_date: Some(date(2030, 4, 1)),
                to_date: None,
                pagination: PaginationParams::default(),
            },
        )
        .await
        .unwrap();

        assert_eq!(result.meta.total, 1);
        assert_eq!(result.data[0].session_date, date(2030, 4, 10));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_session_with_context_joins_names(pool: PgPool) {
        let seeded = test_seed::seed_session(&pool, date(2030, 3, 4)).await;

        let session = SessionService::get_session_with_context(&pool, seeded.session_id)
            .await
            .unwrap();

        assert_eq!(session.class_name, "Rust Fundamentals");
        assert_eq!(session.timeslot_name, "Slot A");
        assert_eq!(session.resource_name.as_deref(), Some("Room 101"));
        assert_eq!(session.branch_id, seeded.branch_id);
    }
}
