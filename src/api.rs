//! Unified HTTP application for Knowledge Engine
//!
//! Merges the chat router with the health probe and the static frontend,
//! then applies CORS and request tracing.
//!
//! ## Endpoint Map
//!
//! | Path          | Method | Description                          |
//! |---------------|--------|--------------------------------------|
//! | `/health`     | GET    | Health probe                         |
//! | `/api/chat`   | POST   | Run one agent turn                   |
//! | `/api/clear`  | POST   | Clear a session's history            |
//! | `/api/stats`  | GET    | Record counts across the documents   |
//! | `/*`          | GET    | Static frontend, when configured     |

use crate::config::ServerConfig;
use crate::gateway::{chat_router, ChatState};
use axum::{
    http::{header, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Build the complete HTTP application
pub fn build_app(chat_state: ChatState, server: &ServerConfig) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_check))
        .merge(chat_router(chat_state));

    if let Some(dir) = &server.frontend_dir {
        if !dir.is_dir() {
            tracing::warn!("Frontend directory {} does not exist", dir.display());
        }
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(build_cors(&server.cors_origins))
        .layer(TraceLayer::new_for_http())
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// CORS
// =============================================================================

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Agent, ChatMessage, LlmClient, LlmResponse};
    use crate::config::LookupConfig;
    use crate::documents::Documents;
    use crate::error::Result;
    use crate::session::SessionStore;
    use crate::tools::{ToolDefinition, ToolSet};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct SilentLlm;

    #[async_trait]
    impl LlmClient for SilentLlm {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _tools: &[ToolDefinition],
        ) -> Result<LlmResponse> {
            Ok(LlmResponse::text("..."))
        }
    }

    fn make_app(server: &ServerConfig) -> (Router, TempDir) {
        let dir = TempDir::new().unwrap();
        let documents = Arc::new(Documents::new(dir.path()));
        let tools = ToolSet::new(documents.clone(), &LookupConfig::default()).unwrap();
        let state = ChatState {
            agent: Arc::new(Agent::new(Arc::new(SilentLlm), tools, 50)),
            sessions: SessionStore::new(),
            documents,
            history_limit: 20,
        };
        (build_app(state, server), dir)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _dir) = make_app(&ServerConfig::default());
        let resp = app.oneshot(get_req("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_chat_routes_are_mounted() {
        let (app, _dir) = make_app(&ServerConfig::default());
        let resp = app.oneshot(get_req("/api/stats")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["success"], true);
    }

    #[tokio::test]
    async fn test_no_frontend_is_404() {
        let (app, _dir) = make_app(&ServerConfig::default());
        let resp = app.oneshot(get_req("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serves_frontend() {
        let site = TempDir::new().unwrap();
        std::fs::write(site.path().join("index.html"), "<h1>Knowledge Engine</h1>").unwrap();
        std::fs::write(site.path().join("logo.svg"), "<svg/>").unwrap();

        let server = ServerConfig {
            frontend_dir: Some(site.path().to_path_buf()),
            ..ServerConfig::default()
        };
        let (app, _dir) = make_app(&server);

        let resp = app.clone().oneshot(get_req("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"<h1>Knowledge Engine</h1>");

        let resp = app.clone().oneshot(get_req("/logo.svg")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        // API routes win over the static fallback
        let resp = app.oneshot(get_req("/health")).await.unwrap();
        assert_eq!(body_json(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let (app, _dir) = make_app(&ServerConfig::default());
        let resp = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/chat")
                    .header("origin", "http://localhost:3000")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            resp.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[test]
    fn test_build_cors_with_origins() {
        let _cors = build_cors(&[
            "http://localhost:5000".to_string(),
            "https://app.example.com".to_string(),
        ]);
    }
}
