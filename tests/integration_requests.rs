mod common;

use axum::http::StatusCode;
use chrono::NaiveDate;
use serde_json::json;
use sqlx::PgPool;

use common::{
    create_test_user, create_virtual_resource, request, seed_schedule, setup_test_app,
};
use praxeum_models::enums::UserRole;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_requests_require_authentication(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = request(app, "GET", "/api/requests", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_staff_cannot_submit_requests(pool: PgPool) {
    let staff = create_test_user(&pool, UserRole::Staff, "Dana").await;
    let app = setup_test_app(pool);

    let (status, _) = request(
        app,
        "POST",
        "/api/requests",
        Some(&staff.token),
        Some(json!({
            "session_id": uuid::Uuid::new_v4(),
            "kind": "swap",
            "replacement_teacher_id": uuid::Uuid::new_v4(),
        })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reschedule_approval_flow(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher, "Alice").await;
    let staff = create_test_user(&pool, UserRole::Staff, "Dana").await;
    let schedule = seed_schedule(&pool, date(2030, 3, 4), teacher.id).await;

    // A second timeslot at the branch to move into.
    let slot_b: uuid::Uuid = sqlx::query_scalar(
        r#"INSERT INTO timeslots (branch_id, name, start_time, end_time)
           VALUES ($1, 'Slot B', '10:00', '12:00') RETURNING id"#,
    )
    .bind(schedule.branch_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    let app = setup_test_app(pool.clone());

    let (status, submitted) = request(
        app.clone(),
        "POST",
        "/api/requests",
        Some(&teacher.token),
        Some(json!({
            "session_id": schedule.session_id,
            "kind": "reschedule",
            "proposed_date": "2030-03-06",
            "proposed_timeslot_id": slot_b,
            "proposed_resource_id": schedule.resource_id,
            "note": "conference that morning",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(submitted["status"], "pending");

    let request_id = submitted["id"].as_str().unwrap().to_string();

    // The teacher cannot decide their own request.
    let (status, _) = request(
        app.clone(),
        "POST",
        &format!("/api/requests/{}/approve", request_id),
        Some(&teacher.token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, approved) = request(
        app.clone(),
        "POST",
        &format!("/api/requests/{}/approve", request_id),
        Some(&staff.token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "approved");
    let new_session_id = approved["new_session_id"].as_str().unwrap().to_string();

    // Old session cancelled, replacement planned at the new slot.
    let (status, old_session) = request(
        app.clone(),
        "GET",
        &format!("/api/sessions/{}", schedule.session_id),
        Some(&staff.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(old_session["status"], "cancelled");

    let (_, new_session) = request(
        app.clone(),
        "GET",
        &format!("/api/sessions/{}", new_session_id),
        Some(&staff.token),
        None,
    )
    .await;
    assert_eq!(new_session["status"], "planned");
    assert_eq!(new_session["session_date"], "2030-03-06");

    // Deciding twice is reported, not silently ignored.
    let (status, body) = request(
        app,
        "POST",
        &format!("/api/requests/{}/approve", request_id),
        Some(&staff.token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "state_conflict");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_modality_conflict_surfaces_resource_conflict(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher, "Alice").await;
    let staff = create_test_user(&pool, UserRole::Staff, "Dana").await;
    let schedule = seed_schedule(&pool, date(2030, 3, 4), teacher.id).await;
    let virtual_link = create_virtual_resource(&pool, schedule.branch_id, "Meet Link Z1").await;

    // Another session already holds the virtual link at the same slot.
    let other_class: uuid::Uuid = sqlx::query_scalar(
        "INSERT INTO course_classes (branch_id, name, modality) VALUES ($1, 'Advanced Rust', 'in_person') RETURNING id",
    )
    .bind(schedule.branch_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    sqlx::query(
        r#"INSERT INTO class_sessions (class_id, session_date, timeslot_id, resource_id, modality)
           VALUES ($1, $2, $3, $4, 'virtual')"#,
    )
    .bind(other_class)
    .bind(date(2030, 3, 4))
    .bind(schedule.timeslot_id)
    .bind(virtual_link)
    .execute(&pool)
    .await
    .unwrap();

    let app = setup_test_app(pool.clone());

    let (status, submitted) = request(
        app.clone(),
        "POST",
        "/api/requests",
        Some(&teacher.token),
        Some(json!({
            "session_id": schedule.session_id,
            "kind": "modality_change",
            "proposed_resource_id": virtual_link,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(
        app.clone(),
        "POST",
        &format!("/api/requests/{}/approve", submitted["id"].as_str().unwrap()),
        Some(&staff.token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "resource_conflict");

    // The availability primitive agrees with the arbitration outcome.
    let (status, availability) = request(
        app,
        "GET",
        &format!(
            "/api/availability/check?resource_id={}&date=2030-03-04&timeslot_id={}",
            virtual_link, schedule.timeslot_id
        ),
        Some(&teacher.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(availability["available"], false);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_swap_confirmation_flow(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher, "Alice").await;
    let nominee = create_test_user(&pool, UserRole::Teacher, "Bob").await;
    let staff = create_test_user(&pool, UserRole::Staff, "Dana").await;
    let schedule = seed_schedule(&pool, date(2030, 3, 4), teacher.id).await;

    let app = setup_test_app(pool.clone());

    let (status, submitted) = request(
        app.clone(),
        "POST",
        "/api/requests",
        Some(&teacher.token),
        Some(json!({
            "session_id": schedule.session_id,
            "kind": "swap",
            "replacement_teacher_id": nominee.id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let request_id = submitted["id"].as_str().unwrap().to_string();

    let (status, nominated) = request(
        app.clone(),
        "POST",
        &format!("/api/requests/{}/approve", request_id),
        Some(&staff.token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(nominated["status"], "waiting_confirm");

    // Only the nominee may confirm.
    let (status, _) = request(
        app.clone(),
        "POST",
        &format!("/api/requests/{}/confirm", request_id),
        Some(&teacher.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, confirmed) = request(
        app.clone(),
        "POST",
        &format!("/api/requests/{}/confirm", request_id),
        Some(&nominee.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "approved");

    // The substitution is visible on the assignments surface.
    let (status, assignments) = request(
        app,
        "GET",
        &format!("/api/sessions/{}/assignments", schedule.session_id),
        Some(&staff.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let assignments = assignments.as_array().unwrap();
    assert_eq!(assignments.len(), 2);
    assert!(assignments.iter().any(|a| {
        a["teacher_id"] == json!(teacher.id.to_string()) && a["status"] == "on_leave"
    }));
    assert!(assignments.iter().any(|a| {
        a["teacher_id"] == json!(nominee.id.to_string()) && a["status"] == "substituted"
    }));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_request_listing_is_scoped(pool: PgPool) {
    let teacher = create_test_user(&pool, UserRole::Teacher, "Alice").await;
    let other = create_test_user(&pool, UserRole::Teacher, "Eve").await;
    let nominee = create_test_user(&pool, UserRole::Teacher, "Bob").await;
    let schedule = seed_schedule(&pool, date(2030, 3, 4), teacher.id).await;

    let app = setup_test_app(pool.clone());

    request(
        app.clone(),
        "POST",
        "/api/requests",
        Some(&teacher.token),
        Some(json!({
            "session_id": schedule.session_id,
            "kind": "swap",
            "replacement_teacher_id": nominee.id,
        })),
    )
    .await;

    let (status, mine) = request(
        app.clone(),
        "GET",
        "/api/requests/mine",
        Some(&teacher.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["meta"]["total"], 1);

    let (_, other_view) = request(
        app.clone(),
        "GET",
        "/api/requests/mine",
        Some(&other.token),
        None,
    )
    .await;
    assert_eq!(other_view["meta"]["total"], 0);

    // The staff-wide listing is off limits to teachers.
    let (status, _) = request(app, "GET", "/api/requests", Some(&teacher.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
