//! Client sessions.
//!
//! A session is established once per principal: it mints one token per
//! server the principal's role may reach (each bound to that server's
//! audience), checks every token against the authority's public key, and
//! keeps the authorization decision so denied servers are refused locally.

use crate::client::ToolTransport;
use crate::error::ClientError;
use rolegate_core::{RolegateConfig, ServerId};
use rolegate_mcp::{CallToolParams, CallToolResponse, JsonRpcRequest, ListToolsResponse, ToolDefinition};
use rolegate_policy::{AuthorizationDecision, RoleAuthorizationPolicy};
use rolegate_token::{ClaimMap, Claims, TokenIssuer, verify};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Who a session acts for.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    pub subject: String,
    pub role: String,
    pub id: Option<String>,
    pub name: Option<String>,
    /// Further claims to embed in every token.
    pub extra: ClaimMap,
}

impl Identity {
    pub fn new(subject: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            role: role.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Claims embedded in every token minted for this identity.
    pub fn additional_claims(&self) -> ClaimMap {
        let mut claims = self.extra.clone();
        claims.insert("role".into(), Value::from(self.role.clone()));
        if let Some(id) = &self.id {
            claims.insert("id".into(), Value::from(id.clone()));
        }
        if let Some(name) = &self.name {
            claims.insert("name".into(), Value::from(name.clone()));
        }
        claims
    }
}

/// An authenticated client session.
pub struct Session {
    claims: Claims,
    decision: AuthorizationDecision,
    tokens: BTreeMap<ServerId, String>,
    transport: Arc<dyn ToolTransport>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("subject", &self.claims.sub)
            .field("decision", &self.decision)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Mint and check this principal's tokens and resolve its decision.
    pub fn establish(
        issuer: &TokenIssuer,
        config: &RolegateConfig,
        identity: &Identity,
        transport: Arc<dyn ToolTransport>,
    ) -> Result<Self, ClientError> {
        let policy = RoleAuthorizationPolicy::from_config(&config.servers);
        let validity = config.auth.token_ttl()?;
        let public_key = issuer.keypair().public_key();

        let decision = policy.resolve(&identity.role);
        let mut tokens = BTreeMap::new();
        let mut verified = None;

        for descriptor in &decision.permitted {
            let audience = config.servers.get(descriptor.id).audience;
            let issued = issuer.issue(
                &identity.subject,
                &config.auth.issuer,
                &audience,
                identity.additional_claims(),
                validity,
            )?;
            let claims = verify(&issued.token, public_key, &config.auth.issuer, &audience)?;
            ensure_verified_role(&identity.role, &claims)?;

            verified.get_or_insert(claims);
            tokens.insert(descriptor.id, issued.token);
        }

        // Every role reaches at least one server, so a token was minted.
        let claims = verified.ok_or_else(|| ClientError::ServerNotPermitted {
            role: identity.role.clone(),
            server: ServerId::HrManagement,
        })?;

        tracing::info!(
            subject = %claims.sub,
            role = %decision.role,
            permitted = ?decision.permitted_ids(),
            denied = ?decision.denied,
            "Session established"
        );

        Ok(Self {
            claims,
            decision,
            tokens,
            transport,
            next_id: AtomicU64::new(1),
        })
    }

    /// Verified claims of the session's principal.
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn decision(&self) -> &AuthorizationDecision {
        &self.decision
    }

    /// Token bound to `server`'s audience, if the role may reach it.
    pub fn token_for(&self, server: ServerId) -> Option<&str> {
        self.tokens.get(&server).map(String::as_str)
    }

    /// User-facing summary of who is logged in and what they can reach.
    pub fn banner(&self) -> String {
        let id = self.claims.id.as_deref().unwrap_or("-");
        let role = if self.claims.role.is_empty() {
            "(none)"
        } else {
            &self.claims.role
        };
        let mut out = format!(
            "Authenticated as {} with role {} with id {}\n",
            self.claims.display_name(),
            role,
            id
        );

        let join = |ids: Vec<ServerId>| {
            if ids.is_empty() {
                "none".to_string()
            } else {
                ids.iter().map(ServerId::as_str).collect::<Vec<_>>().join(", ")
            }
        };
        out.push_str(&format!("Your access: {}\n", join(self.decision.permitted_ids())));
        out.push_str(&format!("No access: {}\n", join(self.decision.denied.clone())));

        out.push_str("\nAvailable systems based on your role:\n");
        for line in self.decision.capabilities().permitted {
            out.push_str(&format!("- {}\n", line));
        }
        out
    }

    /// List the tools of a permitted server.
    pub async fn list_tools(&self, server: ServerId) -> Result<Vec<ToolDefinition>, ClientError> {
        let result = self.rpc(server, "tools/list", None).await?;
        let list: ListToolsResponse =
            serde_json::from_value(result).map_err(|e| ClientError::Protocol {
                server,
                message: e.to_string(),
            })?;
        Ok(list.tools)
    }

    /// Call `tool` on a permitted server.
    pub async fn call_tool(
        &self,
        server: ServerId,
        tool: &str,
        arguments: Value,
    ) -> Result<CallToolResponse, ClientError> {
        let params = CallToolParams {
            name: tool.to_string(),
            arguments,
        };
        let params = serde_json::to_value(params).map_err(|e| ClientError::Protocol {
            server,
            message: e.to_string(),
        })?;

        let result = self.rpc(server, "tools/call", Some(params)).await?;
        serde_json::from_value(result).map_err(|e| ClientError::Protocol {
            server,
            message: e.to_string(),
        })
    }

    /// Tool listings of every permitted server, in canonical order.
    pub async fn discover(&self) -> Vec<(ServerId, Result<Vec<ToolDefinition>, ClientError>)> {
        let mut out = Vec::new();
        for server in self.decision.permitted_ids() {
            out.push((server, self.list_tools(server).await));
        }
        out
    }

    async fn rpc(
        &self,
        server: ServerId,
        method: &str,
        params: Option<Value>,
    ) -> Result<Value, ClientError> {
        let (descriptor, token) = match (self.decision.descriptor(server), self.token_for(server)) {
            (Some(descriptor), Some(token)) => (descriptor, token),
            _ => {
                tracing::warn!(
                    server = %server,
                    role = %self.decision.role,
                    "Refusing call to a server outside the session's role"
                );
                return Err(ClientError::ServerNotPermitted {
                    role: self.claims.role.clone(),
                    server,
                });
            }
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);
        let response = self.transport.send(descriptor, token, request).await?;

        if let Some(error) = response.error {
            let reason = error
                .data
                .as_ref()
                .and_then(|d| d.get("reason"))
                .and_then(Value::as_str)
                .map(str::to_string);
            return Err(ClientError::Rpc {
                server,
                code: error.code,
                message: error.message,
                reason,
            });
        }
        response.result.ok_or_else(|| ClientError::Protocol {
            server,
            message: "response has neither result nor error".to_string(),
        })
    }
}

/// The decision was resolved from the requested role; the token must carry
/// exactly that role once verified.
fn ensure_verified_role(requested: &str, claims: &Claims) -> Result<(), ClientError> {
    if claims.role != requested {
        return Err(ClientError::RoleMismatch {
            requested: requested.to_string(),
            verified: claims.role.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rolegate_core::ResourceServerDescriptor;
    use rolegate_mcp::JsonRpcResponse;
    use rolegate_token::testing;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(ServerId, String, String)>>,
        reply: Option<JsonRpcResponse>,
    }

    #[async_trait]
    impl ToolTransport for Recorder {
        async fn send(
            &self,
            server: &ResourceServerDescriptor,
            token: &str,
            request: JsonRpcRequest,
        ) -> Result<JsonRpcResponse, ClientError> {
            self.calls
                .lock()
                .unwrap()
                .push((server.id, token.to_string(), request.method.clone()));
            Ok(self.reply.clone().unwrap_or_else(|| {
                JsonRpcResponse::success(
                    request.id,
                    json!({"content": [{"type": "text", "text": "ok"}], "isError": false}),
                )
            }))
        }
    }

    fn session(identity: &Identity, transport: Arc<Recorder>) -> Session {
        let issuer = TokenIssuer::new(testing::keypair());
        Session::establish(&issuer, &RolegateConfig::default(), identity, transport).unwrap()
    }

    fn alice(role: &str) -> Identity {
        Identity::new("alice", role).with_id("123").with_name("Alice")
    }

    #[test]
    fn test_tokens_bound_to_each_audience() {
        let s = session(&alice("Manager"), Arc::default());
        let public = testing::keypair().public_key().clone();

        for server in ServerId::ALL {
            let token = s.token_for(server).unwrap();
            let audience = format!("rolegate:{}", server);
            let claims = verify(token, &public, "https://dev-issuer.com", &audience).unwrap();
            assert_eq!(claims.role, "Manager");
            assert!(claims.exp.is_some());
        }
    }

    #[test]
    fn test_decision_follows_verified_role() {
        for role in ["Manager", "AssistantManager", "Officer", "Intern"] {
            let s = session(&alice(role), Arc::default());
            let expected = RoleAuthorizationPolicy::default().resolve(&s.claims().role);
            assert_eq!(s.claims().role, role);
            assert_eq!(*s.decision(), expected);
        }
    }

    #[test]
    fn test_verified_role_must_match_requested() {
        let mut extra = rolegate_token::ClaimMap::new();
        extra.insert("role".into(), json!("Officer"));
        let token = TokenIssuer::new(testing::keypair())
            .issue("alice", "https://dev-issuer.com", "rolegate:crm", extra, None)
            .unwrap()
            .token;
        let claims = verify(
            &token,
            testing::keypair().public_key(),
            "https://dev-issuer.com",
            "rolegate:crm",
        )
        .unwrap();

        assert!(ensure_verified_role("Officer", &claims).is_ok());
        match ensure_verified_role("Manager", &claims).unwrap_err() {
            ClientError::RoleMismatch { requested, verified } => {
                assert_eq!(requested, "Manager");
                assert_eq!(verified, "Officer");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_assistant_manager_gets_no_crm_token() {
        let s = session(&alice("AssistantManager"), Arc::default());
        assert!(s.token_for(ServerId::ProjectManagement).is_some());
        assert!(s.token_for(ServerId::Crm).is_none());
        assert_eq!(s.decision().denied, vec![ServerId::Crm]);
    }

    #[test]
    fn test_banner() {
        let s = session(&alice("AssistantManager"), Arc::default());
        let banner = s.banner();
        assert!(banner.starts_with("Authenticated as Alice with role AssistantManager with id 123"));
        assert!(banner.contains("Your access: hr_management, project_management"));
        assert!(banner.contains("No access: crm"));
        assert!(banner.contains("- Project Management System: Task tracking"));
    }

    #[test]
    fn test_banner_for_unknown_role_shows_claim() {
        let s = session(&Identity::new("eve", "Intern"), Arc::default());
        let banner = s.banner();
        assert!(banner.starts_with("Authenticated as eve with role Intern with id -"));
        assert!(banner.contains("No access: project_management, crm"));
    }

    #[tokio::test]
    async fn test_denied_server_refused_before_io() {
        let transport = Arc::new(Recorder::default());
        let s = session(&alice("Officer"), transport.clone());

        let err = s.call_tool(ServerId::Crm, "list_customers", json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::ServerNotPermitted { server: ServerId::Crm, .. }));
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_call_uses_server_token() {
        let transport = Arc::new(Recorder::default());
        let s = session(&alice("Manager"), transport.clone());

        let result = s
            .call_tool(ServerId::Crm, "list_customers", json!({}))
            .await
            .unwrap();
        assert!(!result.is_error);

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, ServerId::Crm);
        assert_eq!(calls[0].1, s.token_for(ServerId::Crm).unwrap());
        assert_eq!(calls[0].2, "tools/call");
    }

    #[tokio::test]
    async fn test_rpc_error_carries_reason() {
        let transport = Arc::new(Recorder {
            reply: Some(JsonRpcResponse::error_with_data(
                None,
                -32001,
                "token outside its validity window",
                Some(json!({"reason": "TokenExpired"})),
            )),
            ..Recorder::default()
        });
        let s = session(&alice("Manager"), transport);

        match s.list_tools(ServerId::HrManagement).await.unwrap_err() {
            ClientError::Rpc { code, reason, .. } => {
                assert_eq!(code, -32001);
                assert_eq!(reason.as_deref(), Some("TokenExpired"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
