#![allow(dead_code)]

use std::env;

use interview_backend::database::schema::SchemaRequirements;
use interview_backend::services::interview_service::InterviewService;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Connects to `DATABASE_URL` and provisions the interviews table.
///
/// Returns `None` when no database is configured so the calling test can bail out.
pub async fn setup_pool() -> Option<PgPool> {
    dotenvy::dotenv().ok();
    let Ok(database_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL is not set; skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to create test pool");

    let mut tx = pool.begin().await.expect("begin");
    sqlx::query("SELECT pg_advisory_xact_lock(4242)")
        .execute(&mut *tx)
        .await
        .expect("advisory lock");
    sqlx::query("CREATE TABLE IF NOT EXISTS shortlisted_candidate (id SERIAL PRIMARY KEY)")
        .execute(&mut *tx)
        .await
        .expect("create candidate table");
    sqlx::query("CREATE TABLE IF NOT EXISTS jd (jd_id SERIAL PRIMARY KEY)")
        .execute(&mut *tx)
        .await
        .expect("create jd table");
    tx.commit().await.expect("commit");

    service(&pool).ensure_schema().await.expect("ensure schema");
    Some(pool)
}

pub fn service(pool: &PgPool) -> InterviewService {
    InterviewService::new(pool.clone(), SchemaRequirements::default())
}

/// A candidate id unlikely to collide with rows left by other test runs.
pub fn unique_id() -> i32 {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    1_000_000 + (nanos.rem_euclid(1_000_000_000)) as i32
}
