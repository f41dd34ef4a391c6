use std::collections::HashMap;

use serde_json::{Map, Value};

use super::{QueryNode, Visit};
use crate::document::load_node;
use crate::error::{NodeError, QueryError, join_path};
use crate::key::NamespacedKey;
use crate::registry::NodeContext;
use crate::value::{Compound, Tag, TagKind};

pub const COMPOUND_ID: &str = "compound";

/// Node matching a nested compound and projecting its children.
///
/// Declared as `{"id": "wolfyutilities:compound", "children": {...}}`, where
/// `children` follows the same rules as the document root. Children are
/// visited with the compound's full path as their ancestor path, so a mismatch
/// inside `display` is reported at `display.Name`.
#[derive(Debug)]
pub struct CompoundNode {
    id: NamespacedKey,
    key: String,
    parent_path: String,
    children: HashMap<String, Box<dyn QueryNode>>,
}

impl CompoundNode {
    /// Node factory for the registry: requires a `children` object.
    pub fn construct(
        ctx: &NodeContext<'_>,
        fields: &Map<String, Value>,
    ) -> Result<Box<dyn QueryNode>, NodeError> {
        Ok(Box::new(Self::from_fields(ctx, fields)?))
    }

    pub fn from_fields(
        ctx: &NodeContext<'_>,
        fields: &Map<String, Value>,
    ) -> Result<Self, NodeError> {
        let declared = match fields.get("children") {
            Some(Value::Object(children)) => children,
            Some(_) => {
                return Err(NodeError::InvalidField {
                    field: "children",
                    expected: "an object",
                });
            }
            None => return Err(NodeError::MissingField("children")),
        };

        let path = join_path(ctx.parent_path, ctx.key);
        let children = declared
            .iter()
            .filter_map(|(key, value)| {
                load_node(ctx.registry, value, &path, key).map(|node| (key.clone(), node))
            })
            .collect();

        Ok(CompoundNode {
            id: ctx.id.clone(),
            key: ctx.key.to_string(),
            parent_path: ctx.parent_path.to_string(),
            children,
        })
    }

    pub fn child(&self, key: &str) -> Option<&dyn QueryNode> {
        self.children.get(key).map(|node| &**node)
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &dyn QueryNode)> {
        self.children
            .iter()
            .map(|(key, node)| (key.as_str(), &**node))
    }
}

impl QueryNode for CompoundNode {
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
        TagKind::Compound
    }

    fn read_value(
        &self,
        path: &str,
        key: &str,
        input: &Compound,
    ) -> Result<Option<Tag>, QueryError> {
        let Some(nested) = input.get_compound(key) else {
            return Ok(None);
        };

        let child_path = join_path(path, key);
        let mut projected = Compound::new();
        for (child_key, child) in &self.children {
            child.visit(&child_path, child_key, nested, &mut projected)?;
        }
        Ok(Some(Tag::Compound(projected)))
    }

    fn write_value(&self, _path: &str, key: &str, value: Tag, output: &mut Compound) {
        if let Tag::Compound(nested) = value {
            output.set_compound(key, nested);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NodeRegistry;
    use serde_json::json;

    fn build(parent_path: &str, fields: Value) -> Result<CompoundNode, NodeError> {
        let registry = NodeRegistry::builtin();
        let id = NamespacedKey::builtin(COMPOUND_ID);
        let ctx = NodeContext {
            id: &id,
            key: "display",
            parent_path,
            registry,
        };
        let Value::Object(fields) = fields else {
            panic!("fields must be an object");
        };
        CompoundNode::from_fields(&ctx, &fields)
    }

    #[test]
    fn children_record_full_ancestor_path() {
        let node = build(
            "tag",
            json!({"children": {"Name": "", "Lore": "x", "Bad": [1]}}),
        )
        .unwrap();

        assert_eq!(node.children().count(), 2);
        assert!(node.child("Bad").is_none());
        let name = node.child("Name").unwrap();
        assert_eq!(name.parent_path(), "tag.display");
        assert_eq!(name.key(), "Name");
        assert_eq!(name.expected_kind(), TagKind::String);
    }

    #[test]
    fn children_field_is_required() {
        assert!(matches!(
            build("", json!({})),
            Err(NodeError::MissingField("children"))
        ));
        assert!(matches!(
            build("", json!({"children": "Name"})),
            Err(NodeError::InvalidField { field: "children", .. })
        ));
    }

    #[test]
    fn absent_input_compound_reads_nothing() {
        let node = build("", json!({"children": {"Name": ""}})).unwrap();
        assert_eq!(node.read_value("", "display", &Compound::new()).unwrap(), None);
    }
}
