//! Tool generation from a server's domain.
//!
//! | Tool pattern          | Generated when              |
//! |-----------------------|-----------------------------|
//! | `list_<collection>`   | always                      |
//! | `get_<entity>`        | always                      |
//! | `create_<entity>`     | always                      |
//! | `update_<entity>`     | the collection has updatable fields |
//! | `<summary_tool>`      | once per server             |

use crate::domain::{CollectionSpec, DomainSpec};
use crate::protocol::{ToolAnnotations, ToolDefinition};
use serde_json::{Map, Value, json};

/// Every tool `domain` exposes.
pub fn generate_all(domain: &DomainSpec) -> Vec<ToolDefinition> {
    let mut tools = Vec::new();
    for collection in &domain.collections {
        tools.push(list_tool(collection));
        tools.push(get_tool(collection));
        tools.push(create_tool(collection));
        if !collection.updatable.is_empty() {
            tools.push(update_tool(collection));
        }
    }
    tools.push(summary_tool(domain));

    tracing::debug!(
        server = %domain.server,
        tools = ?tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
        "Generated tools"
    );
    tools
}

fn string_properties(fields: &[&str], describe: impl Fn(&str) -> String) -> Map<String, Value> {
    fields
        .iter()
        .map(|f| {
            (
                f.to_string(),
                json!({ "type": "string", "description": describe(f) }),
            )
        })
        .collect()
}

fn read_only(value: bool) -> Option<ToolAnnotations> {
    Some(ToolAnnotations {
        read_only: Some(value),
    })
}

fn list_tool(c: &CollectionSpec) -> ToolDefinition {
    ToolDefinition {
        name: format!("list_{}", c.name),
        description: Some(format!("{} with optional equality filters", c.description)),
        input_schema: json!({
            "type": "object",
            "properties": string_properties(c.filters, |f| format!("Only return records whose {} matches", f)),
            "additionalProperties": false
        }),
        annotations: read_only(true),
    }
}

fn get_tool(c: &CollectionSpec) -> ToolDefinition {
    ToolDefinition {
        name: format!("get_{}", c.entity),
        description: Some(format!("Retrieve a {} by {}", c.entity, c.id_field)),
        input_schema: json!({
            "type": "object",
            "properties": string_properties(&[c.id_field], |_| format!("{} id", c.entity)),
            "required": [c.id_field]
        }),
        annotations: read_only(true),
    }
}

fn create_tool(c: &CollectionSpec) -> ToolDefinition {
    let mut properties = Map::new();
    for field in c.required {
        properties.insert(field.to_string(), json!({ "description": field }));
    }
    if let Some((field, initial)) = c.status {
        properties.insert(
            field.to_string(),
            json!({ "type": "string", "default": initial }),
        );
    }

    ToolDefinition {
        name: format!("create_{}", c.entity),
        description: Some(format!("Create a new {}", c.entity)),
        input_schema: json!({
            "type": "object",
            "properties": properties,
            "required": c.required
        }),
        annotations: read_only(false),
    }
}

fn update_tool(c: &CollectionSpec) -> ToolDefinition {
    let mut properties = string_properties(&[c.id_field], |_| format!("{} to update", c.entity));
    for field in c.updatable {
        properties.insert(field.to_string(), json!({ "description": field }));
    }

    ToolDefinition {
        name: format!("update_{}", c.entity),
        description: Some(format!(
            "Update {} of a {}",
            c.updatable.join(", "),
            c.entity
        )),
        input_schema: json!({
            "type": "object",
            "properties": properties,
            "required": [c.id_field]
        }),
        annotations: read_only(false),
    }
}

fn summary_tool(domain: &DomainSpec) -> ToolDefinition {
    ToolDefinition {
        name: domain.summary_tool.to_string(),
        description: Some(format!("Summary statistics for the {}", domain.server.display_name())),
        input_schema: json!({ "type": "object", "properties": {} }),
        annotations: read_only(true),
    }
}
