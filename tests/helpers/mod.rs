//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::Path;

use axum::Router;
use axum::body::{Body, Bytes};
use http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use animestream_api::{AppState, build_app, build_state};
use animestream_core::config::AppConfig;
use animestream_database::Stores;
use animestream_entity::anime::{Anime, NewAnime, NewEpisode};

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "animestream-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for seeding data directly
    pub state: AppState,
    /// Application config
    pub config: AppConfig,
    upload_dir: TempDir,
}

impl TestApp {
    /// Create a new test application on memory stores and a fresh upload dir
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Like [`TestApp::new`], with a chance to adjust the config first
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");

        let mut config = AppConfig::default();
        config.storage.upload_dir = upload_dir.path().to_string_lossy().into_owned();
        config.auth.token_secret = "integration-test-secret-0123456789".to_string();
        adjust(&mut config);
        config.validate().expect("Test config should be valid");

        let stores = Stores::memory(&config);
        let state = build_state(config.clone(), stores)
            .await
            .expect("Failed to build state");
        let router = build_app(state.clone());

        Self {
            router,
            state,
            config,
            upload_dir,
        }
    }

    /// The temporary upload directory
    pub fn upload_dir(&self) -> &Path {
        self.upload_dir.path()
    }

    /// Write a file into the upload directory
    pub fn write_upload(&self, name: &str, contents: &[u8]) {
        std::fs::write(self.upload_dir().join(name), contents).expect("Failed to write upload");
    }

    /// Create an anime whose episodes point at the given upload file names
    pub async fn seed_anime(&self, title: &str, files: &[&str]) -> Anime {
        self.state
            .catalog_service
            .create(NewAnime {
                title: title.to_string(),
                description: format!("{title} description"),
                episodes: files
                    .iter()
                    .enumerate()
                    .map(|(i, file)| NewEpisode {
                        title: format!("Episode {}", i + 1),
                        video_path: (*file).to_string(),
                    })
                    .collect(),
            })
            .await
            .expect("Failed to seed anime")
    }

    /// POST /register with a JSON body
    pub async fn register(&self, username: &str, password: &str) -> TestResponse {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });
        self.request("POST", "/register", Some(body), None).await
    }

    /// POST /login as a form; returns the raw response
    pub async fn login_response(&self, username: &str, password: &str) -> TestResponse {
        let req = Request::builder()
            .method("POST")
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(format!("username={username}&password={password}")))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Login and return the session cookie value
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self.login_response(username, password).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location(), Some("/dashboard"));
        response
            .cookie(&self.config.session.cookie_name)
            .expect("No session cookie in login response")
    }

    /// Register a fresh account and log it in
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        let response = self.register(username, password).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Register failed: {:?}",
            response.body
        );
        self.login(username, password).await
    }

    /// `Cookie` header value for a session token
    pub fn cookie_header(&self, session: &str) -> String {
        format!("{}={}", self.config.session.cookie_name, session)
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        session: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(session) = session {
            req = req.header(header::COOKIE, self.cookie_header(session));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// POST a multipart body to /upload
    pub async fn upload(&self, body: Vec<u8>, session: Option<&str>) -> TestResponse {
        let mut req = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(header::CONTENT_LENGTH, body.len());

        if let Some(session) = session {
            req = req.header(header::COOKIE, self.cookie_header(session));
        }

        let req = req.body(Body::from(body)).expect("Failed to build request");
        self.send(req).await
    }

    /// POST a streamed multipart body to /upload, without a content length
    pub async fn upload_stream<S>(&self, chunks: S, session: Option<&str>) -> TestResponse
    where
        S: futures::Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static,
    {
        let mut req = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );

        if let Some(session) = session {
            req = req.header(header::COOKIE, self.cookie_header(session));
        }

        let req = req
            .body(Body::from_stream(chunks))
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Send a prepared request
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }
}

/// One part of a multipart body
pub enum Part<'a> {
    /// A text field
    Text(&'a str, &'a str),
    /// A file field: name, original filename, contents
    File(&'a str, &'a str, &'a [u8]),
}

/// Encode parts as `multipart/form-data` with [`BOUNDARY`]
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, contents) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(contents);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body
    pub bytes: Bytes,
    /// Parsed JSON body (`Null` when not JSON)
    pub body: Value,
}

impl TestResponse {
    /// A header value as a string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The redirect target
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// All `Set-Cookie` header values
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// Value set for the named cookie, if any
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.set_cookies().iter().find_map(|raw| {
            let pair = raw.split(';').next()?;
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name).then(|| value.trim().to_string())
        })
    }
}
