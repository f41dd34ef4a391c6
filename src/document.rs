//! Loading query documents from JSON.
//!
//! A query document is a JSON object mapping target keys to node declarations:
//!
//! ```json
//! {
//!   "Damage": "0i",
//!   "Name": { "id": "wolfyutilities:string", "value": "" },
//!   "display": {
//!     "id": "wolfyutilities:compound",
//!     "children": { "Lore": "" }
//!   }
//! }
//! ```
//!
//! Entries that cannot be turned into a node are dropped; the rest of the
//! document is unaffected. Only a source that cannot be read at all fails.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::engine;
use crate::error::{LoadError, NodeError, QueryError};
use crate::infer::{ScalarShape, infer_discriminator};
use crate::key::NamespacedKey;
use crate::node::QueryNode;
use crate::registry::{NodeContext, NodeRegistry};
use crate::value::Compound;

/// An immutable mapping of top-level keys to query nodes.
///
/// Built once, then executed any number of times, possibly from several
/// threads at once.
#[derive(Debug, Default)]
pub struct QueryDocument {
    nodes: HashMap<String, Box<dyn QueryNode>>,
}

impl QueryDocument {
    /// Builds a document from a parsed JSON root object.
    pub fn parse(root: &Value, registry: &NodeRegistry) -> Result<Self, LoadError> {
        let entries = root.as_object().ok_or(LoadError::NotAnObject)?;
        let nodes = entries
            .iter()
            .filter_map(|(key, value)| {
                load_node(registry, value, "", key).map(|node| (key.clone(), node))
            })
            .collect();
        Ok(QueryDocument { nodes })
    }

    /// Parses JSON text. Returns `None` if the text is not a JSON object.
    pub fn parse_str(text: &str, registry: &NodeRegistry) -> Option<Self> {
        serde_json::from_str::<Value>(text)
            .map_err(LoadError::from)
            .and_then(|root| Self::parse(&root, registry))
            .inspect_err(|e| warn!(error = %e, "unreadable query document"))
            .ok()
    }

    pub fn try_load_from_file(
        path: impl AsRef<Path>,
        registry: &NodeRegistry,
    ) -> Result<Self, LoadError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let root: Value = serde_json::from_reader(reader)?;
        Self::parse(&root, registry)
    }

    /// Loads a document from a JSON file.
    ///
    /// Any I/O or parse failure is logged and yields `None`.
    pub fn load_from_file(path: impl AsRef<Path>, registry: &NodeRegistry) -> Option<Self> {
        let path = path.as_ref();
        Self::try_load_from_file(path, registry)
            .inspect_err(|e| {
                warn!(path = %path.display(), error = %e, "failed to load query document")
            })
            .ok()
    }

    /// Applies this document to `input`. See [`engine::execute`].
    pub fn execute(&self, input: &Compound) -> Result<Compound, QueryError> {
        engine::execute(self, input)
    }

    pub fn get(&self, key: &str) -> Option<&dyn QueryNode> {
        self.nodes.get(key).map(|node| &**node)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn QueryNode)> {
        self.nodes
            .iter()
            .map(|(key, node)| (key.as_str(), &**node))
    }
}

/// Builds the node for one document entry, or `None` if it has to be dropped.
pub fn load_node(
    registry: &NodeRegistry,
    value: &Value,
    parent_path: &str,
    key: &str,
) -> Option<Box<dyn QueryNode>> {
    construct_node(registry, value, parent_path, key)
        .inspect_err(|e| debug!(parent_path, key, error = %e, "dropping query entry"))
        .ok()
}

/// Like [`load_node`], but reports why an entry was rejected.
pub fn construct_node(
    registry: &NodeRegistry,
    value: &Value,
    parent_path: &str,
    key: &str,
) -> Result<Box<dyn QueryNode>, NodeError> {
    match value {
        Value::Object(fields) => construct_declared(registry, fields, parent_path, key),
        scalar => {
            let id = infer_discriminator(ScalarShape::of(scalar)).ok_or(NodeError::Uninferable)?;
            let mut fields = Map::new();
            fields.insert("id".to_string(), Value::String(id.to_string()));
            fields.insert("value".to_string(), scalar.clone());
            construct_declared(registry, &fields, parent_path, key)
        }
    }
}

fn construct_declared(
    registry: &NodeRegistry,
    fields: &Map<String, Value>,
    parent_path: &str,
    key: &str,
) -> Result<Box<dyn QueryNode>, NodeError> {
    let id: NamespacedKey = match fields.get("id") {
        Some(Value::String(id)) => id.parse()?,
        Some(_) => {
            return Err(NodeError::InvalidField {
                field: "id",
                expected: "a namespaced key string",
            });
        }
        None => return Err(NodeError::MissingField("id")),
    };
    let factory = registry
        .resolve(&id)
        .ok_or_else(|| NodeError::UnknownType(id.to_string()))?;

    let ctx = NodeContext {
        id: &id,
        key,
        parent_path,
        registry,
    };
    factory(&ctx, fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::TagKind;
    use serde_json::json;

    fn parse(root: Value) -> QueryDocument {
        QueryDocument::parse(&root, NodeRegistry::builtin()).unwrap()
    }

    #[test]
    fn scalar_entries_are_inferred() {
        let doc = parse(json!({
            "A": "5b",
            "B": "5",
            "C": 5,
            "D": 5.0,
        }));
        assert_eq!(doc.get("A").unwrap().expected_kind(), TagKind::Byte);
        assert_eq!(doc.get("B").unwrap().expected_kind(), TagKind::String);
        assert_eq!(doc.get("C").unwrap().expected_kind(), TagKind::Int);
        assert_eq!(doc.get("D").unwrap().expected_kind(), TagKind::Double);
    }

    #[test]
    fn object_entries_resolve_discriminator() {
        let doc = parse(json!({
            "Name": {"id": "wolfyutilities:int", "value": 5},
            "Short": {"id": "short", "value": "2s"},
        }));
        let node = doc.get("Name").unwrap();
        assert_eq!(node.expected_kind(), TagKind::Int);
        assert_eq!(node.id().to_string(), "wolfyutilities:int");
        assert_eq!(node.key(), "Name");
        assert_eq!(node.parent_path(), "");
        assert_eq!(doc.get("Short").unwrap().expected_kind(), TagKind::Short);
    }

    #[test]
    fn bad_entries_are_dropped_individually() {
        let doc = parse(json!({
            "Extra": [1, 2, 3],
            "Flag": true,
            "Nothing": null,
            "Unknown": {"id": "other:thing", "value": 1},
            "NoId": {"value": 1},
            "NoValue": {"id": "wolfyutilities:int"},
            "Overflow": {"id": "wolfyutilities:byte", "value": "1000b"},
            "Word": "Sword",
            "Damage": "0i",
        }));
        assert_eq!(doc.len(), 1);
        assert!(doc.contains_key("Damage"));
        assert!(!doc.contains_key("Overflow"));
        assert!(!doc.contains_key("Extra"));
        // "Sword" ends in 'd' and is not a valid double literal
        assert!(!doc.contains_key("Word"));
    }

    #[test]
    fn declared_numbers_never_drop_entries() {
        let doc = parse(json!({
            "Damage": {"id": "wolfyutilities:int", "value": 5.0},
            "Count": {"id": "wolfyutilities:byte", "value": 1000},
            "Speed": {"id": "wolfyutilities:float", "value": 1e300},
        }));
        assert_eq!(doc.len(), 3);

        let mut input = Compound::new();
        input.set_string("Damage", "x");
        let err = doc.execute(&input).unwrap_err();
        assert_eq!(
            err,
            QueryError::TypeMismatch {
                expected: TagKind::Int,
                actual: TagKind::String,
                path: "Damage".to_string(),
            }
        );
    }

    #[test]
    fn oversized_integer_entry_is_dropped() {
        let doc = QueryDocument::parse_str(
            r#"{"Big": 100000000000000000000, "Damage": 5}"#,
            NodeRegistry::builtin(),
        )
        .unwrap();
        assert_eq!(doc.len(), 1);
        assert!(!doc.contains_key("Big"));
        assert_eq!(doc.get("Damage").unwrap().expected_kind(), TagKind::Int);
    }

    #[test]
    fn construct_node_reports_reason() {
        let registry = NodeRegistry::builtin();
        let err = construct_node(registry, &json!([1]), "", "Extra").unwrap_err();
        assert!(matches!(err, NodeError::Uninferable));

        let err = construct_node(registry, &json!({"id": "x:y"}), "", "K").unwrap_err();
        assert!(matches!(err, NodeError::UnknownType(id) if id == "x:y"));

        let err = construct_node(registry, &json!({"id": 3}), "", "K").unwrap_err();
        assert!(matches!(err, NodeError::InvalidField { field: "id", .. }));
    }

    #[test]
    fn compound_entry_requires_children_object() {
        let doc = parse(json!({
            "display": {
                "id": "wolfyutilities:compound",
                "children": {"Name": "", "Extra": [1]},
            },
            "broken": {"id": "wolfyutilities:compound", "children": [1]},
            "missing": {"id": "wolfyutilities:compound"},
        }));
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("display").unwrap().expected_kind(), TagKind::Compound);
    }

    #[test]
    fn non_object_root_is_rejected() {
        let result = QueryDocument::parse(&json!([1, 2]), NodeRegistry::builtin());
        assert!(matches!(result, Err(LoadError::NotAnObject)));
        assert!(QueryDocument::parse_str("{not json", NodeRegistry::builtin()).is_none());
        assert!(QueryDocument::parse_str("\"text\"", NodeRegistry::builtin()).is_none());
    }

    #[test]
    fn missing_file_yields_none() {
        let doc = QueryDocument::load_from_file(
            "/definitely/not/here/query.json",
            NodeRegistry::builtin(),
        );
        assert!(doc.is_none());
    }
}
