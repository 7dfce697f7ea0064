use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{NaiveDate, NaiveTime};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use praxeum::config::cors::CorsConfig;
use praxeum::config::email::EmailConfig;
use praxeum::config::jwt::JwtConfig;
use praxeum::router::init_router;
use praxeum::state::AppState;
use praxeum::utils::jwt::create_access_token;
use praxeum_models::enums::{AssignmentStatus, Modality, ResourceKind, UserRole};
use praxeum_models::ids::{BranchId, ClassId, ResourceId, SessionId, TimeslotId, UserId};
use praxeum_models::users::User;

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn setup_test_app(pool: PgPool) -> Router {
    let state = AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        email_config: EmailConfig {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@test.com".to_string(),
            from_name: "Test".to_string(),
        },
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    };
    init_router(state, None)
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: UserId,
    pub token: String,
}

pub async fn create_test_user(pool: &PgPool, role: UserRole, first_name: &str) -> TestUser {
    let user = sqlx::query_as::<_, User>(
        r#"INSERT INTO users (first_name, last_name, email, role)
           VALUES ($1, $2, $3, $4)
           RETURNING id, first_name, last_name, email, role, branch_id, created_at, updated_at"#,
    )
    .bind(first_name)
    .bind("Tester")
    .bind(format!(
        "{}-{}@test.com",
        first_name.to_lowercase(),
        Uuid::new_v4()
    ))
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    let token = create_access_token(&user, &test_jwt_config()).unwrap();

    TestUser { id: user.id, token }
}

#[allow(dead_code)]
pub struct TestSchedule {
    pub branch_id: BranchId,
    pub timeslot_id: TimeslotId,
    pub resource_id: ResourceId,
    pub class_id: ClassId,
    pub session_id: SessionId,
}

/// One planned session on `date`, held by a room, for a fresh branch/class.
pub async fn seed_schedule(pool: &PgPool, date: NaiveDate, teacher_id: UserId) -> TestSchedule {
    let branch_id: BranchId = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO branches (name) VALUES ($1) RETURNING id",
    )
    .bind(format!("Branch {}", Uuid::new_v4()))
    .fetch_one(pool)
    .await
    .unwrap()
    .into();

    let timeslot_id: TimeslotId = sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO timeslots (branch_id, name, start_time, end_time)
           VALUES ($1, $2, $3, $4) RETURNING id"#,
    )
    .bind(branch_id)
    .bind("Slot A")
    .bind(NaiveTime::from_hms_opt(8, 0, 0).unwrap())
    .bind(NaiveTime::from_hms_opt(10, 0, 0).unwrap())
    .fetch_one(pool)
    .await
    .unwrap()
    .into();

    let resource_id: ResourceId = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO resources (branch_id, name, kind) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(branch_id)
    .bind("Room 101")
    .bind(ResourceKind::Room)
    .fetch_one(pool)
    .await
    .unwrap()
    .into();

    let class_id: ClassId = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO course_classes (branch_id, name, modality) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(branch_id)
    .bind("Rust Fundamentals")
    .bind(Modality::InPerson)
    .fetch_one(pool)
    .await
    .unwrap()
    .into();

    let session_id: SessionId = sqlx::query_scalar::<_, Uuid>(
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
    .into();

    sqlx::query(
        "INSERT INTO teaching_assignments (session_id, teacher_id, status) VALUES ($1, $2, $3)",
    )
    .bind(session_id)
    .bind(teacher_id)
    .bind(AssignmentStatus::Scheduled)
    .execute(pool)
    .await
    .unwrap();

    TestSchedule {
        branch_id,
        timeslot_id,
        resource_id,
        class_id,
        session_id,
    }
}

pub async fn create_virtual_resource(pool: &PgPool, branch_id: BranchId, name: &str) -> ResourceId {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO resources (branch_id, name, kind) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(branch_id)
    .bind(name)
    .bind(ResourceKind::Virtual)
    .fetch_one(pool)
    .await
    .unwrap()
    .into()
}

pub async fn request(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let body = match body {
        Some(json) => Body::from(serde_json::to_string(&json).unwrap()),
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}
