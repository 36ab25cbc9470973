//! Session against real resource-server routers, in process.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use rolegate_core::{ResourceServerDescriptor, RolegateConfig, ServerId};
use rolegate_mcp::{Gateway, JsonRpcRequest, JsonRpcResponse, ResourceServer, create_router};
use rolegate_runtime::{ClientError, Identity, Session, ToolTransport};
use rolegate_token::{TokenIssuer, TokenVerifier, testing};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceExt;

/// Routes each request to the in-process router of the addressed server.
struct InProcess {
    routers: BTreeMap<ServerId, Router>,
}

impl InProcess {
    /// Every server, each verifying against `audience_of`.
    fn new(audience_of: impl Fn(ServerId) -> String) -> Self {
        let config = RolegateConfig::default();
        let routers = ServerId::ALL
            .into_iter()
            .map(|id| {
                let verifier = TokenVerifier::new(
                    testing::keypair().public_key().clone(),
                    config.auth.issuer.clone(),
                    audience_of(id),
                );
                let router = create_router(
                    Arc::new(ResourceServer::with_sample_data(id).unwrap()),
                    Arc::new(Gateway::new(id, verifier)),
                );
                (id, router)
            })
            .collect();
        Self { routers }
    }
}

#[async_trait]
impl ToolTransport for InProcess {
    async fn send(
        &self,
        server: &ResourceServerDescriptor,
        token: &str,
        request: JsonRpcRequest,
    ) -> Result<JsonRpcResponse, ClientError> {
        let router = self.routers[&server.id].clone();
        let http = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&request).unwrap()))
            .unwrap();

        let response = router.oneshot(http).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        Ok(serde_json::from_slice(&bytes).unwrap())
    }
}

fn establish(role: &str, transport: InProcess) -> Session {
    let issuer = TokenIssuer::new(testing::keypair());
    let identity = Identity::new("alice", role).with_id("123").with_name("Alice");
    Session::establish(&issuer, &RolegateConfig::default(), &identity, Arc::new(transport)).unwrap()
}

fn default_audiences() -> InProcess {
    InProcess::new(|id| format!("rolegate:{}", id))
}

#[tokio::test]
async fn test_manager_reaches_every_server() {
    let session = establish("Manager", default_audiences());

    let discovered = session.discover().await;
    assert_eq!(discovered.len(), 3);
    for (server, tools) in discovered {
        assert!(!tools.unwrap().is_empty(), "{} listed no tools", server);
    }

    let result = session
        .call_tool(ServerId::Crm, "get_customer", json!({"customer_id": "CUST-001"}))
        .await
        .unwrap();
    assert!(!result.is_error);
}

#[tokio::test]
async fn test_assistant_manager_creates_task_but_not_customer() {
    let session = establish("AssistantManager", default_audiences());

    let created = session
        .call_tool(
            ServerId::ProjectManagement,
            "update_task",
            json!({"task_id": "TASK-002", "state": "review"}),
        )
        .await
        .unwrap();
    assert!(!created.is_error);

    let err = session
        .call_tool(ServerId::Crm, "list_customers", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ServerNotPermitted { .. }));
}

#[tokio::test]
async fn test_server_with_unexpected_audience_rejects() {
    let transport = InProcess::new(|id| match id {
        ServerId::HrManagement => "some-other-audience".to_string(),
        other => format!("rolegate:{}", other),
    });
    let session = establish("Officer", transport);

    match session.list_tools(ServerId::HrManagement).await.unwrap_err() {
        ClientError::Rpc { reason, .. } => assert_eq!(reason.as_deref(), Some("AudienceMismatch")),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_tool_failure_is_reported_not_raised() {
    let session = establish("Officer", default_audiences());

    let result = session
        .call_tool(
            ServerId::HrManagement,
            "create_leave_request",
            json!({"employee_id": "EMP-001"}),
        )
        .await
        .unwrap();
    assert!(result.is_error);
}
