//! Resource server implementation.
//!
//! Handles tool discovery and execution for one backend. Requests reach
//! [`ResourceServer::handle_request`] only after the gateway has authorized
//! them, so every call carries a verified [`Principal`].

use crate::domain::DomainSpec;
use crate::error::McpError;
use crate::executor::{ExecutionResult, ToolExecutor};
use crate::protocol::*;
use crate::store::{InMemoryStore, RecordStore};
use crate::tool_generator;
use crate::tools::ToolRegistry;
use rolegate_core::ServerId;
use serde_json::{Value, json};
use std::sync::Arc;

/// One resource server (HR, project management or CRM).
#[derive(Debug, Clone)]
pub struct ResourceServer {
    id: ServerId,
    tools: ToolRegistry,
    executor: ToolExecutor,
}

impl ResourceServer {
    /// Create a server for `id` backed by `store`.
    pub fn new(id: ServerId, store: Arc<dyn RecordStore>) -> Self {
        let domain = Arc::new(DomainSpec::for_server(id));
        let mut tools = ToolRegistry::new();
        for tool in tool_generator::generate_all(&domain) {
            tools.register(tool);
        }

        Self {
            id,
            tools,
            executor: ToolExecutor::new(domain, store),
        }
    }

    /// Create a server over a fresh in-memory store holding the sample records.
    pub fn with_sample_data(id: ServerId) -> Result<Self, McpError> {
        let store = Arc::new(InMemoryStore::new());
        let loaded = DomainSpec::for_server(id).seed(store.as_ref())?;
        tracing::info!(server = %id, records = loaded, "Seeded sample records");
        Ok(Self::new(id, store))
    }

    pub fn id(&self) -> ServerId {
        self.id
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Handle a JSON-RPC request from an authorized caller.
    pub fn handle_request(&self, principal: &Principal, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, principal, request.params),
            _ => JsonRpcResponse::error(
                id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = json!({
            "protocolVersion": "2024-11-05",
            "serverInfo": {
                "name": format!("rolegate-{}", self.id),
                "title": self.id.display_name(),
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            }
        });
        JsonRpcResponse::success(id, result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ListToolsResponse {
            tools: self.tools.list().to_vec(),
        };
        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, -32603, e.to_string()),
        }
    }

    fn handle_call_tool(
        &self,
        id: Option<Value>,
        principal: &Principal,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, -32602, format!("Invalid params: {}", e));
                }
            },
            None => return JsonRpcResponse::error(id, -32602, "Missing params"),
        };

        if !self.tools.contains(&params.name) {
            return JsonRpcResponse::error(id, -32602, format!("Tool not found: {}", params.name));
        }

        match self.executor.execute(&params.name, params.arguments, principal) {
            Ok(result) => execution_result_to_response(id, result),
            Err(e) => JsonRpcResponse::error(id, e.code(), e.to_string()),
        }
    }
}

fn execution_result_to_response(id: Option<Value>, result: ExecutionResult) -> JsonRpcResponse {
    let response = CallToolResponse {
        content: result.content,
        is_error: !result.success,
    };
    match serde_json::to_value(response) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, -32603, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolegate_policy::Role;

    fn principal() -> Principal {
        Principal {
            subject: "bob".into(),
            role: Role::Officer,
            claimed_role: "Officer".into(),
            id: None,
            name: None,
        }
    }

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest::new(1, method, params)
    }

    #[test]
    fn test_initialize() {
        let server = ResourceServer::with_sample_data(ServerId::HrManagement).unwrap();
        let response = server.handle_request(&principal(), request("initialize", None));
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "rolegate-hr_management");
        assert!(response.error.is_none());
    }

    #[test]
    fn test_list_tools() {
        let server = ResourceServer::with_sample_data(ServerId::HrManagement).unwrap();
        let response = server.handle_request(&principal(), request("tools/list", None));
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), server.tools().len());
        assert_eq!(tools[0]["name"], "list_employees");
        assert!(tools[0]["inputSchema"].is_object());
    }

    #[test]
    fn test_call_tool() {
        let server = ResourceServer::with_sample_data(ServerId::HrManagement).unwrap();
        let response = server.handle_request(
            &principal(),
            request(
                "tools/call",
                Some(json!({"name": "get_employee", "arguments": {"employee_id": "EMP-002"}})),
            ),
        );
        let result = response.result.unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["type"], "json");
        assert_eq!(result["content"][0]["json"]["first_name"], "Sarah");
    }

    #[test]
    fn test_failed_tool_is_error_result() {
        let server = ResourceServer::with_sample_data(ServerId::HrManagement).unwrap();
        let response = server.handle_request(
            &principal(),
            request(
                "tools/call",
                Some(json!({"name": "create_employee", "arguments": {"first_name": "Ann"}})),
            ),
        );
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["content"][0]["type"], "text");
    }

    #[test]
    fn test_call_nonexistent_tool() {
        let server = ResourceServer::with_sample_data(ServerId::HrManagement).unwrap();
        let response = server.handle_request(
            &principal(),
            request(
                "tools/call",
                Some(json!({"name": "list_customers", "arguments": {}})),
            ),
        );
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn test_unknown_method() {
        let server = ResourceServer::with_sample_data(ServerId::Crm).unwrap();
        let response = server.handle_request(&principal(), request("resources/list", None));
        assert_eq!(response.error.unwrap().code, -32601);
    }
}
