//! Integration tests for registration, login and logout.

mod helpers;

use http::StatusCode;

#[tokio::test]
async fn test_register_then_duplicate_conflicts() {
    let app = helpers::TestApp::new().await;

    let first = app.register("alice", "password123").await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["message"], "User registered successfully.");

    let second = app.register("alice", "password123").await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_register_short_password_rejected() {
    let app = helpers::TestApp::new().await;

    for username in ["bob", "x", "not valid!"] {
        let response = app.register(username, "short").await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["error"], "VALIDATION_ERROR");
        let errors = response.body["errors"].as_array().expect("errors array");
        assert!(errors.iter().any(|e| e["field"] == "password"));
    }
}

#[tokio::test]
async fn test_register_invalid_username_rejected() {
    let app = helpers::TestApp::new().await;

    for username in ["ab", "this_name_is_far_too_long", "bad-name", "spa ce"] {
        let response = app.register(username, "password123").await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{username}");
        let errors = response.body["errors"].as_array().expect("errors array");
        assert!(errors.iter().any(|e| e["field"] == "username"));
    }
}

#[tokio::test]
async fn test_register_accepts_short_field_names() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/register",
            Some(serde_json::json!({ "user": "carol_1", "pass": "password123" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let session = app.login("carol_1", "password123").await;
    assert!(!session.is_empty());
}

#[tokio::test]
async fn test_login_success_redirects_to_dashboard() {
    let app = helpers::TestApp::new().await;
    app.register("dave", "password123").await;

    let response = app.login_response("dave", "password123").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/dashboard"));

    let cookie = response
        .set_cookies()
        .into_iter()
        .find(|c| c.starts_with("animestream.sid="))
        .expect("session cookie");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_login_failure_redirects_home() {
    let app = helpers::TestApp::new().await;
    app.register("erin", "password123").await;

    for (username, password) in [("erin", "wrongpassword"), ("nobody", "password123"), ("", "")] {
        let response = app.login_response(username, password).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location(), Some("/"));
        assert!(response.cookie("animestream.sid").is_none());
    }
}

#[tokio::test]
async fn test_dashboard_requires_session() {
    let app = helpers::TestApp::new().await;

    let anonymous = app.request("GET", "/dashboard", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let forged = app.request("GET", "/dashboard", None, Some("not-a-session")).await;
    assert_eq!(forged.status, StatusCode::UNAUTHORIZED);

    let session = app.register_and_login("frank", "password123").await;
    app.seed_anime("Frieren", &[]).await;

    let response = app.request("GET", "/dashboard", None, Some(&session)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["username"], "frank");
    assert_eq!(response.body["anime"][0]["title"], "Frieren");
}

#[tokio::test]
async fn test_me_returns_account_without_hash() {
    let app = helpers::TestApp::new().await;
    let session = app.register_and_login("grace", "password123").await;

    let response = app.request("GET", "/api/me", None, Some(&session)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "grace");
    assert!(response.body.get("id").is_some());
    assert!(response.body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = helpers::TestApp::new().await;
    let session = app.register_and_login("heidi", "password123").await;

    let before = app.request("GET", "/api/me", None, Some(&session)).await;
    assert_eq!(before.status, StatusCode::OK);

    let logout = app.request("GET", "/logout", None, Some(&session)).await;
    assert_eq!(logout.status, StatusCode::SEE_OTHER);
    assert_eq!(logout.location(), Some("/"));
    assert_eq!(logout.cookie("animestream.sid").as_deref(), Some(""));

    let after = app.request("GET", "/api/me", None, Some(&session)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_session_redirects() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/logout", None, None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
}
