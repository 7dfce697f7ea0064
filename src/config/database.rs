//! Database connection pool initialization.
//!
//! Reads the connection string from `DATABASE_URL` and hands out a [`PgPool`]
//! that is cheaply cloneable across handlers. Missing configuration or an
//! unreachable database are startup-fatal.

use sqlx::PgPool;
use std::env;

/// Initializes the PostgreSQL connection pool from `DATABASE_URL`.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is unset or the connection fails.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

/// Applies pending migrations from `./migrations`.
pub async fn run_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .expect("Failed to run database migrations");
}
