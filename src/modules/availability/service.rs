use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};
use tracing::instrument;

use praxeum_core::AppError;
use praxeum_models::ids::{ResourceId, SessionId, TimeslotId};

use crate::modules::availability::model::{OccupancyQuery, OccupiedSlot};

pub struct AvailabilityService;

impl AvailabilityService {
    /// Whether a resource is free at (date, timeslot), ignoring the session
    /// under modification so a session can keep its own slot.
    ///
    /// Only PLANNED and DONE sessions occupy; CANCELLED sessions never block.
    /// Callers that are about to reserve the slot must run this on their own
    /// open transaction; the partial unique index on `class_sessions` remains
    /// the ultimate arbiter between concurrent writers.
    pub async fn is_available<'e, E>(
        executor: E,
        resource_id: ResourceId,
        date: NaiveDate,
        timeslot_id: TimeslotId,
        exclude_session_id: Option<SessionId>,
    ) -> Result<bool, AppError>
    where
        E: PgExecutor<'e>,
    {
        let occupied = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                SELECT 1 FROM class_sessions
                WHERE resource_id = $1
                  AND session_date = $2
                  AND timeslot_id = $3
                  AND status <> 'cancelled'
                  AND ($4::uuid IS NULL OR id <> $4)
            )"#,
        )
        .bind(resource_id)
        .bind(date)
        .bind(timeslot_id)
        .bind(exclude_session_id)
        .fetch_one(executor)
        .await?;

        Ok(!occupied)
    }

    /// [`Self::is_available`], failing with a resource-conflict error that
    /// carries enough detail for the UI to suggest an alternative.
    pub async fn ensure_available<'e, E>(
        executor: E,
        resource_id: ResourceId,
        date: NaiveDate,
        timeslot_id: TimeslotId,
        exclude_session_id: Option<SessionId>,
    ) -> Result<(), AppError>
    where
        E: PgExecutor<'e>,
    {
        if Self::is_available(executor, resource_id, date, timeslot_id, exclude_session_id).await? {
            Ok(())
        } else {
            Err(AppError::resource_conflict(anyhow::anyhow!(
                "Resource {} is already occupied on {} at timeslot {}",
                resource_id,
                date,
                timeslot_id
            )))
        }
    }

    /// All occupied (resource, timeslot) pairs on a date, optionally scoped
    /// to one branch.
    #[instrument(skip(db))]
    pub async fn occupancy(
        db: &PgPool,
        query: OccupancyQuery,
    ) -> Result<Vec<OccupiedSlot>, AppError> {
        let mut sql = String::from(
            r#"SELECT
                s.resource_id,
                r.name AS resource_name,
                s.timeslot_id,
                t.name AS timeslot_name,
                s.id AS session_id,
                c.name AS class_name
               FROM class_sessions s
               JOIN resources r ON r.id = s.resource_id
               JOIN timeslots t ON t.id = s.timeslot_id
               JOIN course_classes c ON c.id = s.class_id
               WHERE s.session_date = $1
                 AND s.status <> 'cancelled'
                 AND s.resource_id IS NOT NULL"#,
        );

        if let Some(branch_id) = query.branch_id {
            sql.push_str(&format!(" AND r.branch_id = '{}'", branch_id));
        }
        sql.push_str(" ORDER BY t.start_time, r.name");

        let slots = sqlx::query_as::<_, OccupiedSlot>(&sql)
            .bind(query.date)
            .fetch_all(db)
            .await?;

        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::test_seed;
    use praxeum_core::ErrorCode;
    use praxeum_models::enums::ResourceKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_occupied_slot_is_unavailable(pool: PgPool) {
        let seeded = test_seed::seed_session(&pool, date(2030, 3, 4)).await;

        let available = AvailabilityService::is_available(
            &pool,
            seeded.resource_id,
            date(2030, 3, 4),
            seeded.timeslot_id,
            None,
        )
        .await
        .unwrap();

        assert!(!available);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_free_slot_is_available(pool: PgPool) {
        let seeded = test_seed::seed_session(&pool, date(2030, 3, 4)).await;

        // Same resource, different date.
        let available = AvailabilityService::is_available(
            &pool,
            seeded.resource_id,
            date(2030, 3, 5),
            seeded.timeslot_id,
            None,
        )
        .await
        .unwrap();

        assert!(available);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_session_can_keep_its_own_resource(pool: PgPool) {
        let seeded = test_seed::seed_session(&pool, date(2030, 3, 4)).await;

        let available = AvailabilityService::is_available(
            &pool,
            seeded.resource_id,
            date(2030, 3, 4),
            seeded.timeslot_id,
            Some(seeded.session_id),
        )
        .await
        .unwrap();

        assert!(available);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_cancelled_sessions_never_block(pool: PgPool) {
        let seeded = test_seed::seed_session(&pool, date(2030, 3, 4)).await;

        sqlx::query("UPDATE class_sessions SET status = 'cancelled' WHERE id = $1")
            .bind(seeded.session_id)
            .execute(&pool)
            .await
            .unwrap();

        let available = AvailabilityService::is_available(
            &pool,
            seeded.resource_id,
            date(2030, 3, 4),
            seeded.timeslot_id,
            None,
        )
        .await
        .unwrap();

        assert!(available);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_ensure_available_yields_resource_conflict(pool: PgPool) {
        let seeded = test_seed::seed_session(&pool, date(2030, 3, 4)).await;

        let err = AvailabilityService::ensure_available(
            &pool,
            seeded.resource_id,
            date(2030, 3, 4),
            seeded.timeslot_id,
            None,
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ResourceConflict);
        assert!(err.error.to_string().contains(&seeded.resource_id.to_string()));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_occupancy_lists_held_slots(pool: PgPool) {
        let seeded = test_seed::seed_session(&pool, date(2030, 3, 4)).await;

        // A second occupied resource at the same branch, same day.
        let other_resource = test_seed::create_resource(
            &pool,
            seeded.branch_id,
            "Room 102",
            ResourceKind::Room,
        )
        .await;
        test_seed::create_session(
            &pool,
            seeded.class_id,
            date(2030, 3, 4),
            seeded.timeslot_id,
            Some(other_resource),
        )
        .await;

        let slots = AvailabilityService::occupancy(
            &pool,
            OccupancyQuery {
                date: date(2030, 3, 4),
                branch_id: Some(seeded.branch_id),
            },
        )
        .await
        .unwrap();

        assert_eq!(slots.len(), 2);
        assert!(slots.iter().any(|s| s.resource_id == seeded.resource_id));
        assert!(slots.iter().any(|s| s.resource_id == other_resource));
    }
}
