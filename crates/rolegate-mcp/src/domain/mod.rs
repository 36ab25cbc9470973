//! Collections served by each resource server, and their sample data.
//!
//! A server's domain is a list of collections. Every collection yields a
//! `list_`, `get_` and `create_` tool, an `update_` tool when some fields are
//! updatable, and the server as a whole has one summary tool.

mod crm;
mod hr;
mod projects;

use crate::store::{Record, RecordStore};
use rolegate_core::ServerId;
use serde_json::Value;

/// Shape of one collection of records.
#[derive(Debug, Clone)]
pub struct CollectionSpec {
    /// Plural name, used for the `list_` tool (`employees`).
    pub name: &'static str,
    /// Singular name, used for the other tools (`employee`).
    pub entity: &'static str,
    /// Field holding the record id (`employee_id`).
    pub id_field: &'static str,
    /// Prefix of generated ids (`EMP`).
    pub id_prefix: &'static str,
    /// Fields that must be present and non-empty on create.
    pub required: &'static [&'static str],
    /// Fields accepted as equality filters by `list_`.
    pub filters: &'static [&'static str],
    /// Fields the `update_` tool may change.
    pub updatable: &'static [&'static str],
    /// `(field, collection)` pairs whose value must name an existing record.
    pub references: &'static [(&'static str, &'static str)],
    /// Field counted per value in the summary, with its initial value.
    pub status: Option<(&'static str, &'static str)>,
    pub description: &'static str,
}

/// Everything one resource server exposes.
#[derive(Debug, Clone)]
pub struct DomainSpec {
    pub server: ServerId,
    /// Name of the summary tool (`hr_summary`).
    pub summary_tool: &'static str,
    pub collections: Vec<CollectionSpec>,
    seed: fn() -> Vec<(&'static str, Value)>,
}

/// What a tool name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolAction<'a> {
    List(&'a CollectionSpec),
    Get(&'a CollectionSpec),
    Create(&'a CollectionSpec),
    Update(&'a CollectionSpec),
    Summary,
}

impl PartialEq for CollectionSpec {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for CollectionSpec {}

impl DomainSpec {
    /// The domain served by `server`.
    pub fn for_server(server: ServerId) -> Self {
        match server {
            ServerId::HrManagement => hr::domain(),
            ServerId::ProjectManagement => projects::domain(),
            ServerId::Crm => crm::domain(),
        }
    }

    pub fn collection(&self, name: &str) -> Option<&CollectionSpec> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Map a tool name back to the action it performs.
    pub fn resolve(&self, tool: &str) -> Option<ToolAction<'_>> {
        if tool == self.summary_tool {
            return Some(ToolAction::Summary);
        }
        self.collections.iter().find_map(|c| {
            if tool.strip_prefix("list_") == Some(c.name) {
                Some(ToolAction::List(c))
            } else if tool.strip_prefix("get_") == Some(c.entity) {
                Some(ToolAction::Get(c))
            } else if tool.strip_prefix("create_") == Some(c.entity) {
                Some(ToolAction::Create(c))
            } else if tool.strip_prefix("update_") == Some(c.entity) && !c.updatable.is_empty() {
                Some(ToolAction::Update(c))
            } else {
                None
            }
        })
    }

    /// Load the sample records into `store`.
    pub fn seed(&self, store: &dyn RecordStore) -> Result<usize, crate::error::McpError> {
        let mut loaded = 0;
        for (collection, value) in (self.seed)() {
            let Some(spec) = self.collection(collection) else {
                continue;
            };
            let record: Record = serde_json::from_value(value)?;
            let id = record
                .get(spec.id_field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            store.insert(collection, &id, record)?;
            loaded += 1;
        }
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    #[test]
    fn test_resolve_tool_names() {
        let domain = DomainSpec::for_server(ServerId::ProjectManagement);
        assert!(matches!(
            domain.resolve("list_tasks"),
            Some(ToolAction::List(c)) if c.name == "tasks"
        ));
        assert!(matches!(
            domain.resolve("update_task"),
            Some(ToolAction::Update(_))
        ));
        assert_eq!(domain.resolve("project_summary"), Some(ToolAction::Summary));
        assert_eq!(domain.resolve("list_customers"), None);
        assert_eq!(domain.resolve("drop_tasks"), None);
    }

    #[test]
    fn test_seed_ids_match_id_field() {
        for server in ServerId::ALL {
            let domain = DomainSpec::for_server(server);
            let store = InMemoryStore::new();
            let loaded = domain.seed(&store).unwrap();
            assert!(loaded > 0);

            for spec in &domain.collections {
                for record in store.list(spec.name) {
                    let id = record[spec.id_field].as_str().unwrap();
                    assert!(id.starts_with(spec.id_prefix), "{} in {}", id, spec.name);
                }
            }
        }
    }

    #[test]
    fn test_seed_references_resolve() {
        for server in ServerId::ALL {
            let domain = DomainSpec::for_server(server);
            let store = InMemoryStore::new();
            domain.seed(&store).unwrap();

            for spec in &domain.collections {
                for record in store.list(spec.name) {
                    for (field, target) in spec.references {
                        let id = record[*field].as_str().unwrap();
                        assert!(store.get(target, id).is_some(), "{} -> {}", field, id);
                    }
                }
            }
        }
    }
}
