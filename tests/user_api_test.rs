mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn signup_login_and_settings() {
    let Some(app) = common::setup_app().await else {
        return;
    };
    let router = &app.router;
    let username = common::unique("learner");
    let user_id = common::signup(router, &username).await;

    let (status, _) = common::send(
        router,
        "POST",
        "/api/signup",
        Some(json!({
            "username": username,
            "email": "someone-else@example.com",
            "password": "x"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = common::send(
        router,
        "POST",
        "/api/signup",
        Some(json!({ "username": "", "email": "not-an-email", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = common::send(
        router,
        "POST",
        "/api/login",
        Some(json!({ "username": username, "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], json!(user_id));
    assert_eq!(body["username"], json!(username));

    let (status, wrong_password) = common::send(
        router,
        "POST",
        "/api/login",
        Some(json!({ "username": username, "password": "battery staple" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, unknown_user) = common::send(
        router,
        "POST",
        "/api/login",
        Some(json!({ "username": common::unique("ghost"), "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_user);

    let settings_uri = format!("/api/user/settings/{}", user_id);
    let (status, body) = common::send(router, "GET", &settings_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["learning_style"], json!("text"));

    let (status, _) = common::send(
        router,
        "POST",
        "/api/update-settings",
        Some(json!({ "user_id": user_id.to_string(), "learning_style": "video" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::send(
        router,
        "POST",
        "/api/update-settings",
        Some(json!({ "user_id": user_id, "learning_style": "podcast" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::send(
        router,
        "POST",
        "/api/update-settings",
        Some(json!({ "learning_style": "video" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = common::send(router, "GET", &settings_uri, None).await;
    assert_eq!(body["learning_style"], json!("video"));

    let (status, _) = common::send(router, "GET", "/api/user/settings/2147483000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
