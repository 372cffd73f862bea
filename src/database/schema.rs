use sqlx::PgPool;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Serializes concurrent schema provisioning across processes.
const SCHEMA_LOCK_KEY: i64 = 0x696e_7476_7701;

const INTERVIEW_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS interviews (
        id SERIAL PRIMARY KEY,
        candidate_id INTEGER NOT NULL,
        jd_id INTEGER NOT NULL,
        transcript TEXT,
        status TEXT NOT NULL DEFAULT 'scheduled'
            CHECK (status IN ('scheduled', 'in_progress', 'completed', 'cancelled')),
        start_time TIMESTAMPTZ,
        end_time TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_interviews_candidate_id ON interviews(candidate_id)",
    "CREATE INDEX IF NOT EXISTS idx_interviews_jd_id ON interviews(jd_id)",
    "CREATE INDEX IF NOT EXISTS idx_interviews_status ON interviews(status)",
    "CREATE INDEX IF NOT EXISTS idx_interviews_start_time ON interviews(start_time)",
];

/// Tables owned by other systems that must exist before interviews can reference them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRequirements {
    pub candidate_table: String,
    pub jd_table: String,
}

impl Default for SchemaRequirements {
    fn default() -> Self {
        Self {
            candidate_table: "shortlisted_candidate".to_string(),
            jd_table: "jd".to_string(),
        }
    }
}

impl SchemaRequirements {
    fn tables(&self) -> [&str; 2] {
        [self.candidate_table.as_str(), self.jd_table.as_str()]
    }
}

pub async fn missing_tables(pool: &PgPool, requirements: &SchemaRequirements) -> Result<Vec<String>> {
    let mut missing = Vec::new();
    for table in requirements.tables() {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = ANY(current_schemas(false)) AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;
        if !exists {
            missing.push(table.to_string());
        }
    }
    Ok(missing)
}

/// Creates the interviews table and its indexes if they are absent.
///
/// Never creates the candidate or job description tables; if either is missing
/// this fails with [`Error::PrerequisiteMissing`] before touching anything.
pub async fn ensure_interview_schema(pool: &PgPool, requirements: &SchemaRequirements) -> Result<()> {
    let missing = missing_tables(pool, requirements).await?;
    if !missing.is_empty() {
        warn!(?missing, "Cannot initialize interviews table");
        return Err(Error::PrerequisiteMissing(missing.join(", ")));
    }

    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;
    for statement in INTERVIEW_DDL {
        sqlx::query(*statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("Interviews table initialized");
    Ok(())
}
