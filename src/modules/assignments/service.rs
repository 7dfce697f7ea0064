use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use praxeum_core::AppError;
use praxeum_models::enums::AssignmentStatus;
use praxeum_models::ids::{SessionId, UserId};

use crate::modules::assignments::model::{AssignmentWithTeacher, TeachingAssignment};

pub struct AssignmentService;

impl AssignmentService {
    /// All assignments for a session, joined with teacher identity.
    #[instrument(skip(db))]
    pub async fn list_for_session(
        db: &PgPool,
        session_id: SessionId,
    ) -> Result<Vec<AssignmentWithTeacher>, AppError> {
        let assignments = sqlx::query_as::<_, AssignmentWithTeacher>(
            r#"SELECT
                a.session_id,
                a.teacher_id,
                u.first_name AS teacher_first_name,
                u.last_name AS teacher_last_name,
                u.email AS teacher_email,
                a.status,
                a.created_at,
                a.updated_at
               FROM teaching_assignments a
               JOIN users u ON u.id = a.teacher_id
               WHERE a.session_id = $1
               ORDER BY a.created_at"#,
        )
        .bind(session_id)
        .fetch_all(db)
        .await?;

        Ok(assignments)
    }

    /// The session's active teacher assignment (SCHEDULED or SUBSTITUTED),
    /// if any.
    pub async fn active_assignment<'e, E>(
        executor: E,
        session_id: SessionId,
    ) -> Result<Option<TeachingAssignment>, AppError>
    where
        E: PgExecutor<'e>,
    {
        let assignment = sqlx::query_as::<_, TeachingAssignment>(
            r#"SELECT session_id, teacher_id, status, created_at, updated_at
               FROM teaching_assignments
               WHERE session_id = $1 AND status IN ('scheduled', 'substituted')"#,
        )
        .bind(session_id)
        .fetch_optional(executor)
        .await?;

        Ok(assignment)
    }

    /// Whether the teacher is the session's active assignee.
    pub async fn is_active_teacher<'e, E>(
        executor: E,
        session_id: SessionId,
        teacher_id: UserId,
    ) -> Result<bool, AppError>
    where
        E: PgExecutor<'e>,
    {
        let active = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                SELECT 1 FROM teaching_assignments
                WHERE session_id = $1 AND teacher_id = $2
                  AND status IN ('scheduled', 'substituted')
            )"#,
        )
        .bind(session_id)
        .bind(teacher_id)
        .fetch_one(executor)
        .await?;

        Ok(active)
    }

    /// Idempotent upsert keyed on (session, teacher): re-applying the same
    /// status is a no-op. Reserved for the change-request workflow.
    pub(crate) async fn upsert<'e, E>(
        executor: E,
        session_id: SessionId,
        teacher_id: UserId,
        status: AssignmentStatus,
    ) -> Result<TeachingAssignment, AppError>
    where
        E: PgExecutor<'e>,
    {
        let assignment = sqlx::query_as::<_, TeachingAssignment>(
            r#"INSERT INTO teaching_assignments (session_id, teacher_id, status)
               VALUES ($1, $2, $3)
               ON CONFLICT (session_id, teacher_id)
               DO UPDATE SET status = EXCLUDED.status, updated_at = NOW()
               RETURNING session_id, teacher_id, status, created_at, updated_at"#,
        )
        .bind(session_id)
        .bind(teacher_id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(assignment)
    }

    /// Copies every assignment row from one session to another. Used when a
    /// reschedule replaces a session so the new occurrence keeps its teachers.
    pub(crate) async fn copy_to_session<'e, E>(
        executor: E,
        from_session: SessionId,
        to_session: SessionId,
    ) -> Result<(), AppError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"INSERT INTO teaching_assignments (session_id, teacher_id, status)
               SELECT $2, teacher_id, status
               FROM teaching_assignments
               WHERE session_id = $1
               ON CONFLICT (session_id, teacher_id) DO NOTHING"#,
        )
        .bind(from_session)
        .bind(to_session)
        .execute(executor)
        .await?;

        Ok(())
    }
}
