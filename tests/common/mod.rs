#![allow(dead_code)]

use std::env;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use roadmap_backend::services::ai_service::AIService;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub state: roadmap_backend::AppState,
}

/// Builds the app against `DATABASE_URL`, or returns `None` when no database
/// is configured so the suite can run without PostgreSQL.
pub async fn setup_app() -> Option<TestApp> {
    dotenvy::dotenv().ok();
    if env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    }
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("GEMINI_API_KEY", "test-key");
    env::set_var("PUBLIC_RPS", "1000");

    roadmap_backend::config::ensure_config().expect("init config");
    let pool = roadmap_backend::database::pool::create_pool()
        .await
        .expect("pool");
    roadmap_backend::database::pool::run_migrations(&pool)
        .await
        .expect("migrations");

    let state = roadmap_backend::AppState::new(pool.clone()).expect("state");
    let router = roadmap_backend::build_router(state.clone(), 1000);
    Some(TestApp {
        router,
        pool,
        state,
    })
}

pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, rand::random::<u32>())
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, body)
}

pub async fn signup(app: &Router, username: &str) -> i32 {
    let (status, body) = send(
        app,
        "POST",
        "/api/signup",
        Some(serde_json::json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "correct horse"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
    body["user_id"].as_i64().unwrap() as i32
}

/// Serves a fixed Gemini `generateContent` reply carrying `reply_text` and
/// returns its base URL.
pub async fn spawn_gemini_stub(reply_text: &str) -> String {
    let body = serde_json::json!({
        "candidates": [ { "content": { "parts": [ { "text": reply_text } ] } } ]
    });
    let stub = Router::new().fallback(move || {
        let body = body.clone();
        async move { axum::Json(body) }
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub).await.unwrap();
    });
    format!("http://{}/v1beta", addr)
}

pub fn router_with_ai(app: &TestApp, base_url: String) -> Router {
    let mut state = app.state.clone();
    state.ai_service = AIService::new(
        "test-key".to_string(),
        "gemini-flash-latest".to_string(),
        base_url,
        Duration::from_secs(10),
        reqwest::Client::new(),
    );
    roadmap_backend::build_router(state, 1000)
}
