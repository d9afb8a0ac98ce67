pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    ai_service::AIService, quiz_service::QuizService, roadmap_service::RoadmapService,
    user_service::UserService,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use reqwest::Client;
use sqlx::PgPool;
use std::time::Duration;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub ai_service: AIService,
    pub roadmap_service: RoadmapService,
    pub quiz_service: QuizService,
    pub user_service: UserService,
}

impl AppState {
    pub fn new(pool: PgPool) -> error::Result<Self> {
        let config = crate::config::get_config();
        let timeout = Duration::from_secs(config.ai_timeout_secs);
        let http_client = Client::builder().timeout(timeout).build()?;

        let ai_service = AIService::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
            timeout,
            http_client,
        );

        Ok(Self {
            roadmap_service: RoadmapService::new(pool.clone()),
            quiz_service: QuizService::new(pool.clone()),
            user_service: UserService::new(pool.clone()),
            ai_service,
            pool,
        })
    }
}

pub fn build_router(state: AppState, rps: u32) -> Router {
    let api = Router::new()
        .route("/api/generate-roadmap", post(routes::roadmap::generate_roadmap))
        .route("/api/roadmap/:module_id", get(routes::roadmap::get_roadmap))
        .route("/api/my-goals/:user_id", get(routes::roadmap::my_goals))
        .route("/api/submit-quiz", post(routes::quiz::submit_quiz))
        .route("/api/signup", post(routes::auth::signup))
        .route("/api/login", post(routes::auth::login))
        .route("/api/user/settings/:user_id", get(routes::settings::get_settings))
        .route("/api/update-settings", post(routes::settings::update_settings))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::RateLimiter::new(rps),
            middleware::rate_limit::rps_middleware,
        ));

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api-docs/openapi.json", get(routes::docs::openapi_json))
        .merge(api)
        .with_state(state)
        .layer(middleware::cors::api_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}
