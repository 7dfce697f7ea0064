//! Seed helpers shared by service-level tests.

use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use praxeum_models::enums::{AssignmentStatus, Modality, ResourceKind, UserRole};
use praxeum_models::ids::{BranchId, ClassId, ResourceId, SessionId, TimeslotId, UserId};

pub async fn create_branch(pool: &PgPool) -> BranchId {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO branches (name, address) VALUES ($1, $2) RETURNING id",
    )
    .bind(format!("Branch {}", Uuid::new_v4()))
    .bind("1 Test Street")
    .fetch_one(pool)
    .await
    .unwrap()
    .into()
}

pub async fn create_user(pool: &PgPool, role: UserRole, first_name: &str) -> UserId {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO users (first_name, last_name, email, role)
           VALUES ($1, $2, $3, $4) RETURNING id"#,
    )
    .bind(first_name)
    .bind("Tester")
    .bind(format!("{}-{}@test.com", first_name.to_lowercase(), Uuid::new_v4()))
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
    .into()
}

pub async fn create_timeslot(pool: &PgPool, branch_id: BranchId, name: &str) -> TimeslotId {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO timeslots (branch_id, name, start_time, end_time)
           VALUES ($1, $2, $3, $4) RETURNING id"#,
    )
    .bind(branch_id)
    .bind(name)
    .bind(NaiveTime::from_hms_opt(8, 0, 0).unwrap())
    .bind(NaiveTime::from_hms_opt(10, 0, 0).unwrap())
    .fetch_one(pool)
    .await
    .unwrap()
    .into()
}

pub async fn create_resource(
    pool: &PgPool,
    branch_id: BranchId,
    name: &str,
    kind: ResourceKind,
) -> ResourceId {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO resources (branch_id, name, kind)
           VALUES ($1, $2, $3) RETURNING id"#,
    )
    .bind(branch_id)
    .bind(name)
    .bind(kind)
    .fetch_one(pool)
    .await
    .unwrap()
    .into()
}

pub async fn create_class(pool: &PgPool, branch_id: BranchId, name: &str) -> ClassId {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO course_classes (branch_id, name, modality)
           VALUES ($1, $2, $3) RETURNING id"#,
    )
    .bind(branch_id)
    .bind(name)
    .bind(Modality::InPerson)
    .fetch_one(pool)
    .await
    .unwrap()
    .into()
}

pub async fn create_session(
    pool: &PgPool,
    class_id: ClassId,
    date: NaiveDate,
    timeslot_id: TimeslotId,
    resource_id: Option<ResourceId>,
) -> SessionId {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO class_sessions (class_id, session_date, timeslot_id, resource_id, modality)
           VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
    )
    .bind(class_id)
    .bind(date)
    .bind(timeslot_id)
    .bind(resource_id)
    .bind(Modality::InPerson)
    .fetch_one(pool)
    .await
    .unwrap()
    .into()
}

pub async fn assign_teacher(
    pool: &PgPool,
    session_id: SessionId,
    teacher_id: UserId,
    status: AssignmentStatus,
) {
    sqlx::query(
        r#"INSERT INTO teaching_assignments (session_id, teacher_id, status)
           VALUES ($1, $2, $3)
           ON CONFLICT (session_id, teacher_id) DO UPDATE SET status = EXCLUDED.status"#,
    )
    .bind(session_id)
    .bind(teacher_id)
    .bind(status)
    .execute(pool)
    .await
    .unwrap();
}

/// One fully-wired scheduling scenario: a branch with a timeslot, a room, a
/// class, a planned session held by the room, and a scheduled teacher.
pub struct SeededSession {
    pub branch_id: BranchId,
    pub timeslot_id: TimeslotId,
    pub resource_id: ResourceId,
    pub class_id: ClassId,
    pub session_id: SessionId,
    pub teacher_id: UserId,
}

pub async fn seed_session(pool: &PgPool, date: NaiveDate) -> SeededSession {
    let branch_id = create_branch(pool).await;
    let timeslot_id = create_timeslot(pool, branch_id, "Slot A").await;
    let resource_id = create_resource(pool, branch_id, "Room 101", ResourceKind::Room).await;
    let class_id = create_class(pool, branch_id, "Rust Fundamentals").await;
    let session_id = create_session(pool, class_id, date, timeslot_id, Some(resource_id)).await;
    let teacher_id = create_user(pool, UserRole::Teacher, "Alice").await;
    assign_teacher(pool, session_id, teacher_id, AssignmentStatus::Scheduled).await;

    SeededSession {
        branch_id,
        timeslot_id,
        resource_id,
        class_id,
        session_id,
        teacher_id,
    }
}
