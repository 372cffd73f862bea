use axum::{
    routing::{get, post},
    Router,
};
use interview_backend::{
    config::{get_config, init_config},
    database::{pool::create_pool, schema::SchemaRequirements},
    middleware::{cors::cors_layer, rate_limit},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    init_config()?;
    let config = get_config();

    let pool = create_pool(config).await?;

    let app_state = AppState::new(
        pool,
        SchemaRequirements {
            candidate_table: config.candidate_table.clone(),
            jd_table: config.jd_table.clone(),
        },
    );
    app_state.interview_service.ensure_schema().await?;

    let base_routes = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/openapi.json", get(routes::docs::openapi_json));

    let interview_api = Router::new()
        .route(
            "/api/interviews",
            get(routes::interview::list_interviews).post(routes::interview::create_interview),
        )
        .route(
            "/api/interviews/:id",
            get(routes::interview::get_interview),
        )
        .route(
            "/api/interviews/:id/start",
            post(routes::interview::start_interview),
        )
        .route(
            "/api/interviews/:id/qa",
            post(routes::interview::append_qa),
        )
        .route(
            "/api/interviews/:id/end",
            post(routes::interview::end_interview),
        )
        .route(
            "/api/interviews/:id/cancel",
            post(routes::interview::cancel_interview),
        )
        .route(
            "/api/interviews/:id/transcript",
            get(routes::interview::get_transcript),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RateLimiter::new(config.public_rps),
            rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(interview_api)
        .with_state(app_state)
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
