//! Tool execution engine.
//!
//! Runs `list_`, `get_`, `create_`, `update_` and summary tools against the
//! server's [`RecordStore`]. Domain failures (missing fields, unknown ids)
//! come back as an error result the caller can read; malformed arguments are
//! reported as [`McpError::InvalidArguments`].

use crate::domain::{CollectionSpec, DomainSpec, ToolAction};
use crate::error::McpError;
use crate::protocol::{Principal, ToolContent};
use crate::store::{Record, RecordStore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,
    /// The result content.
    pub content: Vec<ToolContent>,
    /// Error message if failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Create a successful result with JSON content.
    pub fn success_json(value: Value) -> Self {
        Self {
            success: true,
            content: vec![ToolContent::Json { json: value }],
            error: None,
        }
    }

    /// Create a successful result with a text message.
    pub fn success_text(text: impl Into<String>) -> Self {
        Self {
            success: true,
            content: vec![ToolContent::Text { text: text.into() }],
            error: None,
        }
    }

    /// Create an error result.
    pub fn error(message: impl Into<String>) -> Self {
        let msg = message.into();
        Self {
            success: false,
            content: vec![ToolContent::Text { text: msg.clone() }],
            error: Some(msg),
        }
    }
}

/// Executes tools for one server.
#[derive(Clone)]
pub struct ToolExecutor {
    domain: Arc<DomainSpec>,
    store: Arc<dyn RecordStore>,
}

impl std::fmt::Debug for ToolExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolExecutor")
            .field("server", &self.domain.server)
            .finish_non_exhaustive()
    }
}

impl ToolExecutor {
    pub fn new(domain: Arc<DomainSpec>, store: Arc<dyn RecordStore>) -> Self {
        Self { domain, store }
    }

    pub fn domain(&self) -> &DomainSpec {
        &self.domain
    }

    /// Execute `tool` with `arguments` on behalf of `principal`.
    pub fn execute(
        &self,
        tool: &str,
        arguments: Value,
        principal: &Principal,
    ) -> Result<ExecutionResult, McpError> {
        let action = self
            .domain
            .resolve(tool)
            .ok_or_else(|| McpError::ToolNotFound {
                name: tool.to_string(),
            })?;
        let args = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(McpError::InvalidArguments {
                    tool: tool.to_string(),
                    reason: format!("expected an object, got {}", other),
                });
            }
        };

        tracing::debug!(
            server = %self.domain.server,
            tool = %tool,
            subject = %principal.subject,
            "Executing tool"
        );

        match action {
            ToolAction::List(c) => self.list(tool, c, &args),
            ToolAction::Get(c) => self.get(tool, c, &args),
            ToolAction::Create(c) => self.create(c, args, principal),
            ToolAction::Update(c) => self.update(tool, c, args),
            ToolAction::Summary => Ok(self.summary()),
        }
    }

    fn list(&self, tool: &str, c: &CollectionSpec, args: &Record) -> Result<ExecutionResult, McpError> {
        if let Some(unknown) = args.keys().find(|k| !c.filters.contains(&k.as_str())) {
            return Err(McpError::InvalidArguments {
                tool: tool.to_string(),
                reason: format!(
                    "unknown filter '{}' (allowed: {})",
                    unknown,
                    c.filters.join(", ")
                ),
            });
        }

        let records: Vec<Record> = self
            .store
            .list(c.name)
            .into_iter()
            .filter(|record| {
                args.iter()
                    .filter(|(_, wanted)| !wanted.is_null())
                    .all(|(field, wanted)| {
                        record.get(field).is_some_and(|actual| matches_filter(actual, wanted))
                    })
            })
            .collect();

        let count = records.len();
        Ok(ExecutionResult::success_json(json!({
            c.name: records,
            "count": count,
        })))
    }

    fn get(&self, tool: &str, c: &CollectionSpec, args: &Record) -> Result<ExecutionResult, McpError> {
        let id = required_id(tool, c, args)?;
        Ok(match self.store.get(c.name, &id) {
            Some(record) => ExecutionResult::success_json(Value::Object(record)),
            None => ExecutionResult::error(format!("{} {} not found", c.entity, id)),
        })
    }

    fn create(
        &self,
        c: &CollectionSpec,
        mut args: Record,
        principal: &Principal,
    ) -> Result<ExecutionResult, McpError> {
        let missing: Vec<&str> = c
            .required
            .iter()
            .copied()
            .filter(|field| args.get(*field).is_none_or(is_blank))
            .collect();
        if !missing.is_empty() {
            return Ok(ExecutionResult::error(format!(
                "{} CREATION FAILED: Missing required information.\n\nMissing fields: {}\n\nRequired fields are: {}",
                c.entity.replace('_', " ").to_uppercase(),
                missing.join(", "),
                c.required.join(", ")
            )));
        }

        for (field, target) in c.references {
            let Some(id) = args.get(*field).and_then(Value::as_str) else {
                continue;
            };
            if self.store.get(target, id).is_none() {
                return Ok(ExecutionResult::error(format!(
                    "{} CREATION FAILED: {} {} not found",
                    c.entity.replace('_', " ").to_uppercase(),
                    field,
                    id
                )));
            }
        }

        let id = format!("{}-{}", c.id_prefix, short_id());
        args.insert(c.id_field.to_string(), Value::from(id.clone()));
        if let Some((field, initial)) = c.status {
            args.entry(field.to_string())
                .or_insert_with(|| Value::from(initial));
        }
        args.insert("created_by".to_string(), Value::from(principal.subject.clone()));

        self.store.insert(c.name, &id, args)?;
        tracing::info!(
            server = %self.domain.server,
            collection = %c.name,
            id = %id,
            subject = %principal.subject,
            "Record created"
        );
        Ok(ExecutionResult::success_text(format!(
            "{} {} successfully created",
            c.entity.replace('_', " "),
            id
        )))
    }

    fn update(&self, tool: &str, c: &CollectionSpec, mut args: Record) -> Result<ExecutionResult, McpError> {
        let id = required_id(tool, c, &args)?;
        args.remove(c.id_field);

        if let Some(field) = args.keys().find(|k| !c.updatable.contains(&k.as_str())) {
            return Err(McpError::InvalidArguments {
                tool: tool.to_string(),
                reason: format!(
                    "field '{}' cannot be updated (allowed: {})",
                    field,
                    c.updatable.join(", ")
                ),
            });
        }
        if args.is_empty() {
            return Err(McpError::InvalidArguments {
                tool: tool.to_string(),
                reason: format!("nothing to update (allowed: {})", c.updatable.join(", ")),
            });
        }

        Ok(match self.store.update(c.name, &id, args) {
            Some(record) => ExecutionResult::success_json(Value::Object(record)),
            None => ExecutionResult::error(format!("{} {} not found", c.entity, id)),
        })
    }

    fn summary(&self) -> ExecutionResult {
        let mut summary = Map::new();
        for c in &self.domain.collections {
            let records = self.store.list(c.name);
            summary.insert(format!("total_{}", c.name), Value::from(records.len()));

            if let Some((field, _)) = c.status {
                let mut counts: BTreeMap<String, u64> = BTreeMap::new();
                for record in &records {
                    let key = record
                        .get(field)
                        .and_then(Value::as_str)
                        .unwrap_or("unknown")
                        .to_string();
                    *counts.entry(key).or_default() += 1;
                }
                summary.insert(format!("{}_by_{}", c.name, field), json!(counts));
            }
        }
        ExecutionResult::success_json(json!({ "summary": summary }))
    }
}

fn required_id(tool: &str, c: &CollectionSpec, args: &Record) -> Result<String, McpError> {
    args.get(c.id_field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| McpError::InvalidArguments {
            tool: tool.to_string(),
            reason: format!("'{}' is required", c.id_field),
        })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Strings compare case-insensitively, everything else exactly.
fn matches_filter(actual: &Value, wanted: &Value) -> bool {
    match (actual, wanted) {
        (Value::String(a), Value::String(w)) => a.eq_ignore_ascii_case(w),
        (a, w) => a == w,
    }
}

fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}
