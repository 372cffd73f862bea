pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::database::schema::SchemaRequirements;
use crate::services::interview_service::InterviewService;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub interview_service: InterviewService,
}

impl AppState {
    pub fn new(pool: PgPool, requirements: SchemaRequirements) -> Self {
        let interview_service = InterviewService::new(pool.clone(), requirements);

        Self {
            pool,
            interview_service,
        }
    }
}
