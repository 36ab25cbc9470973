//! HTTP transport for the resource servers.
//!
//! `POST /mcp` carries JSON-RPC and sits behind the authorization gateway.
//! `GET /health` is open.

use crate::error::McpError;
use crate::gateway::{Gateway, enforce_gateway};
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, Principal};
use crate::server::ResourceServer;
use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the HTTP router for one resource server.
pub fn create_router(server: Arc<ResourceServer>, gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route(
            "/mcp",
            post(handle_mcp_post).route_layer(middleware::from_fn_with_state(gateway, enforce_gateway)),
        )
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

/// Handle POST requests to /mcp (JSON-RPC over HTTP).
async fn handle_mcp_post(
    State(server): State<Arc<ResourceServer>>,
    Extension(principal): Extension<Principal>,
    body: Bytes,
) -> impl IntoResponse {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return Json(JsonRpcResponse::error(None, -32700, format!("Parse error: {}", e)));
        }
    };

    tracing::info!(
        server = %server.id(),
        subject = %principal.subject,
        method = %request.method,
        "Handling request"
    );
    Json(server.handle_request(&principal, request))
}

/// Handle health check requests.
async fn handle_health(State(server): State<Arc<ResourceServer>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": format!("rolegate-{}", server.id()),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// HTTP server for one resource server.
pub struct HttpServer {
    listen: String,
    server: Arc<ResourceServer>,
    gateway: Arc<Gateway>,
}

impl HttpServer {
    pub fn new(listen: impl Into<String>, server: ResourceServer, gateway: Gateway) -> Self {
        Self {
            listen: listen.into(),
            server: Arc::new(server),
            gateway: Arc::new(gateway),
        }
    }

    /// Run until ctrl-c.
    pub async fn run(self) -> Result<(), McpError> {
        let id = self.server.id();
        let app = create_router(self.server, self.gateway);

        let listener = tokio::net::TcpListener::bind(&self.listen)
            .await
            .map_err(|e| {
                McpError::StartupFailed(format!("Failed to bind to {}: {}", self.listen, e))
            })?;

        tracing::info!(server = %id, listen = %self.listen, "Resource server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!(server = %id, "Resource server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use rolegate_core::ServerId;
    use rolegate_token::{ClaimMap, TokenVerifier, issue, testing};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const ISS: &str = "https://dev-issuer.com";
    const AUD: &str = "rolegate:hr_management";

    fn app() -> Router {
        let verifier = TokenVerifier::new(testing::keypair().public_key().clone(), ISS, AUD);
        create_router(
            Arc::new(ResourceServer::with_sample_data(ServerId::HrManagement).unwrap()),
            Arc::new(Gateway::new(ServerId::HrManagement, verifier)),
        )
    }

    fn bearer() -> String {
        let mut claims = ClaimMap::new();
        claims.insert("role".into(), json!("Officer"));
        let token = issue(&testing::keypair(), "bob", ISS, AUD, claims, None)
            .unwrap()
            .token;
        format!("Bearer {}", token)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["service"], "rolegate-hr_management");
    }

    #[tokio::test]
    async fn test_mcp_requires_credential() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"]["data"]["reason"], "MissingCredential");
    }

    #[tokio::test]
    async fn test_mcp_with_token() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header(header::AUTHORIZATION, bearer())
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"jsonrpc":"2.0","id":7,"method":"tools/list"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], 7);
        assert!(body["result"]["tools"].as_array().unwrap().len() > 3);
    }

    #[tokio::test]
    async fn test_mcp_parse_error() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header(header::AUTHORIZATION, bearer())
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["error"]["code"], -32700);
    }
}
