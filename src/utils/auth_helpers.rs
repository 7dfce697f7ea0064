//! Identity resolution helpers used by services for authorization checks.

use sqlx::PgPool;

use praxeum_core::AppError;
use praxeum_models::enums::UserRole;
use praxeum_models::ids::UserId;
use praxeum_models::users::User;

/// Resolve a user by ID or fail with a not-found error.
pub async fn get_user(db: &PgPool, user_id: UserId) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"SELECT id, first_name, last_name, email, role, branch_id, created_at, updated_at
           FROM users WHERE id = $1"#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
}

/// Resolve a user and require the staff role. Used for decider checks.
pub async fn get_staff_user(db: &PgPool, user_id: UserId) -> Result<User, AppError> {
    let user = get_user(db, user_id).await?;
    if user.role != UserRole::Staff {
        return Err(AppError::forbidden(anyhow::anyhow!(
            "Only staff members can decide change requests"
        )));
    }
    Ok(user)
}
