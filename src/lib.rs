//! Personal site backend - library for app logic and testing

pub mod chat;
pub mod config;
pub mod logging;
pub mod posts;
pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::SiteConfig;
use crate::state::AppState;

/// Global request body cap.
pub const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// CORS for the configured frontend origins. Origins that are not valid
/// header values are skipped.
pub fn configure_cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Create and configure the application router.
///
/// The body cap is axum's `DefaultBodyLimit`, so an oversized body reaches
/// the handlers as an extractor rejection.
pub fn create_app(state: AppState, origins: &[String]) -> Router {
    Router::new()
        .route("/api/chat", post(routes::chat::chat))
        .route("/api/blog", get(routes::blog::list_posts))
        .route("/health", get(routes::health::health_ping))
        .route("/health/ready", get(routes::health::health_ready))
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(configure_cors(origins))
}

async fn serve(config: &SiteConfig) -> Result<(), BoxError> {
    routes::health::init_start_time();

    let state = AppState::from_config(config)?;
    tracing::info!(content_dir = %config.content_dir.display(), "serving posts");
    tracing::info!(origins = ?config.allowed_origins, "CORS configured");

    let app = create_app(state, &config.allowed_origins);

    let addr = config.bind_addr().map_err(|e| {
        tracing::error!(host = %config.host, port = config.port, "invalid HOST/PORT configuration");
        e
    })?;
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Run the server (used by main).
pub async fn run() -> Result<(), BoxError> {
    let config = SiteConfig::from_env();

    // Dropping the guards flushes the log writers, so errors are logged here.
    let _log_guards = logging::init(&config);

    let result = serve(&config).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "server stopped with error");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatBackend, CANNED_OUTPUT};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(content_dir: &std::path::Path) -> Router {
        create_app(
            AppState::new(content_dir, ChatBackend::Canned),
            &["http://localhost:5173".to_string()],
        )
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, headers, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_chat_through_full_stack() {
        let tmp = tempfile::tempdir().unwrap();
        let req = Request::post("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"prompt":"hi"}"#))
            .unwrap();
        let (status, headers, json) = send(app(tmp.path()), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["output"], CANNED_OUTPUT);
        assert!(headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let tmp = tempfile::tempdir().unwrap();
        let req = Request::get("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let (status, headers, _) = send(app(tmp.path()), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get("x-request-id").unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn test_blog_through_full_stack() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("hello-world");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("+page.md"),
            "---\ntitle: Hello\ndate: 2024-06-01\nauthor: Kozu\n---\nHi\n",
        )
        .unwrap();

        let req = Request::get("/api/blog").body(Body::empty()).unwrap();
        let (status, _, json) = send(app(tmp.path()), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["posts"][0]["slug"], "hello-world");
        assert_eq!(json["posts"][0]["title"], "Hello");
    }

    #[tokio::test]
    async fn test_oversized_chat_body_is_json_500() {
        let tmp = tempfile::tempdir().unwrap();
        let body = vec![b' '; BODY_LIMIT_BYTES + 10];
        let req = Request::post("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap();
        let (status, headers, json) = send(app(tmp.path()), req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert!(!json["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let tmp = tempfile::tempdir().unwrap();
        let req = Request::get("/health")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let (_, headers, _) = send(app(tmp.path()), req).await;
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
    }

    #[test]
    fn test_configure_cors_skips_invalid_origins() {
        let _layer = configure_cors(&["http://ok.dev".to_string(), "bad\norigin".to_string()]);
    }

    #[tokio::test]
    async fn test_serve_reports_invalid_bind_address() {
        let config = SiteConfig {
            host: "not a host".to_string(),
            port: 3001,
            environment: "development".to_string(),
            log_level: None,
            log_dir: std::path::PathBuf::from("logs"),
            content_dir: std::path::PathBuf::from(config::DEFAULT_CONTENT_DIR),
            allowed_origins: Vec::new(),
            chat: config::ChatUpstreamConfig::default(),
        };
        let err = serve(&config).await.unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_chat_rejects_get() {
        let tmp = tempfile::tempdir().unwrap();
        let req = Request::get("/api/chat").body(Body::empty()).unwrap();
        let res = app(tmp.path()).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
