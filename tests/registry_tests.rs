// Registering node kinds from outside the crate.

use nbt_query::{
    Compound, NamespacedKey, NodeContext, NodeError, NodeRegistry, QueryDocument, QueryError,
    QueryNode, Tag, TagKind, execute, parse_compound,
};
use serde_json::{Map, Value, json};

/// Projects an int array, optionally keeping only the first `limit` elements.
#[derive(Debug)]
struct IntArrayNode {
    id: NamespacedKey,
    key: String,
    parent_path: String,
    limit: Option<usize>,
}

impl IntArrayNode {
    fn construct(
        ctx: &NodeContext<'_>,
        fields: &Map<String, Value>,
    ) -> Result<Box<dyn QueryNode>, NodeError> {
        let limit = match fields.get("limit") {
            None => None,
            Some(v) => Some(v.as_u64().ok_or(NodeError::InvalidField {
                field: "limit",
                expected: "a non-negative integer",
            })? as usize),
        };
        Ok(Box::new(IntArrayNode {
            id: ctx.id.clone(),
            key: ctx.key.to_string(),
            parent_path: ctx.parent_path.to_string(),
            limit,
        }))
    }
}

impl QueryNode for IntArrayNode {
    fn id(&self) -> &NamespacedKey {
        &self.id
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn parent_path(&self) -> &str {
        &self.parent_path
    }

    fn expected_kind(&self) -> TagKind {
        TagKind::IntArray
    }

    fn read_value(
        &self,
        _path: &str,
        key: &str,
        input: &Compound,
    ) -> Result<Option<Tag>, QueryError> {
        Ok(match input.get(key) {
            Some(Tag::IntArray(values)) => {
                let keep = self.limit.unwrap_or(values.len()).min(values.len());
                Some(Tag::IntArray(values[..keep].to_vec()))
            }
            _ => None,
        })
    }

    fn write_value(&self, _path: &str, key: &str, value: Tag, output: &mut Compound) {
        output.insert(key, value);
    }
}

fn registry() -> NodeRegistry {
    let mut registry = NodeRegistry::with_builtins();
    registry.register(
        NamespacedKey::new("myplugin", "int_array").unwrap(),
        IntArrayNode::construct,
    );
    registry
}

#[test]
fn test_custom_kind_is_resolved() {
    let registry = registry();
    let query = QueryDocument::parse(
        &json!({
            "Colors": {"id": "myplugin:int_array", "limit": 2},
            "Damage": "0i",
        }),
        &registry,
    )
    .unwrap();
    assert_eq!(query.len(), 2);

    let input = parse_compound("{Colors: [I; 7, 8, 9], Damage: 1}").unwrap();
    let output = execute(&query, &input).unwrap();
    assert_eq!(output.get("Colors"), Some(&Tag::IntArray(vec![7, 8])));
    assert_eq!(output.get_int("Damage"), Some(1));
}

#[test]
fn test_custom_kind_uses_shared_mismatch_check() {
    let registry = registry();
    let query =
        QueryDocument::parse(&json!({"Colors": {"id": "myplugin:int_array"}}), &registry).unwrap();

    let input = parse_compound("{Colors: [L; 1, 2]}").unwrap();
    let err = execute(&query, &input).unwrap_err();
    assert_eq!(
        err,
        QueryError::TypeMismatch {
            expected: TagKind::IntArray,
            actual: TagKind::LongArray,
            path: "Colors".into(),
        }
    );
}

#[test]
fn test_custom_kind_inside_builtin_compound() {
    let registry = registry();
    let query = QueryDocument::parse(
        &json!({
            "display": {
                "id": "wolfyutilities:compound",
                "children": {"Colors": {"id": "myplugin:int_array", "limit": 1}},
            }
        }),
        &registry,
    )
    .unwrap();

    let input = parse_compound("{display: {Colors: [I; 3, 4]}}").unwrap();
    let output = execute(&query, &input).unwrap();
    let display = output.get_compound("display").unwrap();
    assert_eq!(display.get("Colors"), Some(&Tag::IntArray(vec![3])));
}

#[test]
fn test_unregistered_kind_is_dropped() {
    let query = QueryDocument::parse(
        &json!({"Colors": {"id": "myplugin:int_array"}}),
        NodeRegistry::builtin(),
    )
    .unwrap();
    assert!(query.is_empty());
}

#[test]
fn test_invalid_custom_fields_drop_entry() {
    let registry = registry();
    let query = QueryDocument::parse(
        &json!({"Colors": {"id": "myplugin:int_array", "limit": "two"}}),
        &registry,
    )
    .unwrap();
    assert!(query.is_empty());
}
