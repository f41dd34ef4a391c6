use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde_json::{Map, Number, Value};

use super::QueryNode;
use crate::error::{NodeError, QueryError};
use crate::key::NamespacedKey;
use crate::registry::NodeContext;
use crate::value::{Compound, Tag, TagKind};

pub const BYTE_ID: &str = "byte";
pub const SHORT_ID: &str = "short";
pub const INT_ID: &str = "int";
pub const LONG_ID: &str = "long";
pub const FLOAT_ID: &str = "float";
pub const DOUBLE_ID: &str = "double";
pub const STRING_ID: &str = "string";

/// A leaf tag kind with a direct typed accessor pair on [`Compound`].
pub trait Primitive: fmt::Debug + Send + Sync + 'static {
    type Value: Clone + fmt::Debug + PartialEq + Send + Sync;

    const KIND: TagKind;

    /// Path of the built-in discriminator, e.g. `"int"`.
    const ID: &'static str;

    /// Parses the `value` field of a node declaration.
    fn parse_literal(value: &Value) -> Result<Self::Value, NodeError>;

    fn read(tree: &Compound, key: &str) -> Option<Self::Value>;

    fn write(tree: &mut Compound, key: &str, value: Self::Value);

    fn into_tag(value: Self::Value) -> Tag;

    fn from_tag(tag: Tag) -> Option<Self::Value>;
}

/// Node binding one primitive tag kind to a key.
///
/// The declared literal is parsed and kept, but extraction always copies the
/// value found in the input tree.
#[derive(Debug)]
pub struct PrimitiveNode<P: Primitive> {
    id: NamespacedKey,
    key: String,
    parent_path: String,
    declared: P::Value,
    kind: PhantomData<P>,
}

impl<P: Primitive> PrimitiveNode<P> {
    pub fn new(ctx: &NodeContext<'_>, declared: P::Value) -> Self {
        PrimitiveNode {
            id: ctx.id.clone(),
            key: ctx.key.to_string(),
            parent_path: ctx.parent_path.to_string(),
            declared,
            kind: PhantomData,
        }
    }

    /// Node factory for the registry: requires a `value` field.
    pub fn construct(
        ctx: &NodeContext<'_>,
        fields: &Map<String, Value>,
    ) -> Result<Box<dyn QueryNode>, NodeError> {
        let value = fields.get("value").ok_or(NodeError::MissingField("value"))?;
        let declared = P::parse_literal(value)?;
        Ok(Box::new(Self::new(ctx, declared)))
    }

    /// The literal given in the document.
    pub fn declared(&self) -> &P::Value {
        &self.declared
    }
}

impl<P: Primitive> QueryNode for PrimitiveNode<P> {
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
        P::KIND
    }

    fn read_value(
        &self,
        _path: &str,
        key: &str,
        input: &Compound,
    ) -> Result<Option<Tag>, QueryError> {
        Ok(P::read(input, key).map(P::into_tag))
    }

    fn write_value(&self, _path: &str, key: &str, value: Tag, output: &mut Compound) {
        if let Some(value) = P::from_tag(value) {
            P::write(output, key, value);
        }
    }
}

/// Parses a numeric literal given either as JSON text, with optional type
/// suffix characters, or as a JSON number.
///
/// Text must parse exactly at the target width. JSON numbers are narrowed
/// instead, so `5.0` declares int `5` and `1000` declares byte `-24`.
fn parse_numeric<T: FromStr>(
    kind: TagKind,
    suffixes: &[char],
    value: &Value,
    from_number: impl Fn(&Number) -> Option<T>,
) -> Result<T, NodeError> {
    let invalid = |literal: String| NodeError::InvalidLiteral { kind, literal };
    match value {
        Value::String(text) => text
            .trim_end_matches(suffixes)
            .trim()
            .parse()
            .map_err(|_| invalid(text.clone())),
        Value::Number(n) => from_number(n).ok_or_else(|| invalid(n.to_string())),
        _ => Err(NodeError::InvalidField {
            field: "value",
            expected: "a string or number",
        }),
    }
}

/// Narrows a JSON number to `i64`. Fractions are truncated, out-of-range
/// floats saturate and integers above `i64::MAX` wrap.
fn number_to_i64(n: &Number) -> Option<i64> {
    n.as_i64()
        .or_else(|| n.as_u64().map(|v| v as i64))
        .or_else(|| n.as_f64().map(|v| v as i64))
}

/// Narrows a JSON number to `i32`; integers wrap, floats saturate.
fn number_to_i32(n: &Number) -> Option<i32> {
    n.as_i64()
        .or_else(|| n.as_u64().map(|v| v as i64))
        .map(|v| v as i32)
        .or_else(|| n.as_f64().map(|v| v as i32))
}

macro_rules! numeric_primitive {
    ($(
        $(#[$meta:meta])*
        $kind_ty:ident, $alias:ident, $id:ident, $variant:ident, $ty:ty,
        [$($suffix:literal),*], $get:ident, $set:ident, $from_number:expr;
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug)]
            pub struct $kind_ty;

            impl Primitive for $kind_ty {
                type Value = $ty;

                const KIND: TagKind = TagKind::$variant;
                const ID: &'static str = $id;

                fn parse_literal(value: &Value) -> Result<$ty, NodeError> {
                    parse_numeric(TagKind::$variant, &[$($suffix),*], value, $from_number)
                }

                fn read(tree: &Compound, key: &str) -> Option<$ty> {
                    tree.$get(key)
                }

                fn write(tree: &mut Compound, key: &str, value: $ty) {
                    tree.$set(key, value);
                }

                fn into_tag(value: $ty) -> Tag {
                    Tag::$variant(value)
                }

                fn from_tag(tag: Tag) -> Option<$ty> {
                    match tag {
                        Tag::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }

            pub type $alias = PrimitiveNode<$kind_ty>;
        )*
    };
}

numeric_primitive! {
    ByteKind, ByteNode, BYTE_ID, Byte, i8, ['b', 'B'], get_byte, set_byte,
        |n: &Number| number_to_i32(n).map(|v| v as i8);
    ShortKind, ShortNode, SHORT_ID, Short, i16, ['s', 'S'], get_short, set_short,
        |n: &Number| number_to_i32(n).map(|v| v as i16);
    IntKind, IntNode, INT_ID, Int, i32, ['i', 'I'], get_int, set_int,
        number_to_i32;
    LongKind, LongNode, LONG_ID, Long, i64, ['l', 'L'], get_long, set_long,
        number_to_i64;
    /// Single precision; JSON numbers are narrowed from `f64`.
    FloatKind, FloatNode, FLOAT_ID, Float, f32, ['f', 'F'], get_float, set_float,
        |n: &Number| n.as_f64().map(|v| v as f32);
    DoubleKind, DoubleNode, DOUBLE_ID, Double, f64, ['d', 'D'], get_double, set_double,
        |n: &Number| n.as_f64();
}

#[derive(Debug)]
pub struct StringKind;

impl Primitive for StringKind {
    type Value = String;

    const KIND: TagKind = TagKind::String;
    const ID: &'static str = STRING_ID;

    fn parse_literal(value: &Value) -> Result<String, NodeError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(NodeError::InvalidField {
                field: "value",
                expected: "a string or number",
            }),
        }
    }

    fn read(tree: &Compound, key: &str) -> Option<String> {
        tree.get_string(key).map(str::to_owned)
    }

    fn write(tree: &mut Compound, key: &str, value: String) {
        tree.set_string(key, value);
    }

    fn into_tag(value: String) -> Tag {
        Tag::String(value)
    }

    fn from_tag(tag: Tag) -> Option<String> {
        match tag {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }
}

pub type StringNode = PrimitiveNode<StringKind>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Visit;
    use crate::registry::NodeRegistry;
    use serde_json::json;

    fn ctx<'a>(registry: &'a NodeRegistry, id: &'a NamespacedKey) -> NodeContext<'a> {
        NodeContext {
            id,
            key: "Damage",
            parent_path: "",
            registry,
        }
    }

    #[test]
    fn int_literal_strips_suffix() {
        assert_eq!(IntKind::parse_literal(&json!("5i")).unwrap(), 5);
        assert_eq!(IntKind::parse_literal(&json!("-12I")).unwrap(), -12);
        assert_eq!(IntKind::parse_literal(&json!(7)).unwrap(), 7);
    }

    #[test]
    fn text_literals_are_range_checked() {
        assert!(ByteKind::parse_literal(&json!("300b")).is_err());
        assert!(ShortKind::parse_literal(&json!("70000s")).is_err());
        assert!(IntKind::parse_literal(&json!("2.5i")).is_err());
        assert_eq!(ByteKind::parse_literal(&json!("-128b")).unwrap(), -128);
    }

    #[test]
    fn json_numbers_are_narrowed() {
        assert_eq!(IntKind::parse_literal(&json!(5.0)).unwrap(), 5);
        assert_eq!(IntKind::parse_literal(&json!(-2.9)).unwrap(), -2);
        assert_eq!(IntKind::parse_literal(&json!(1e12)).unwrap(), i32::MAX);
        assert_eq!(ByteKind::parse_literal(&json!(1000)).unwrap(), -24);
        assert_eq!(ByteKind::parse_literal(&json!(300)).unwrap(), 44);
        assert_eq!(ShortKind::parse_literal(&json!(70000)).unwrap(), 4464);
        assert_eq!(LongKind::parse_literal(&json!(2.5)).unwrap(), 2);
        assert_eq!(LongKind::parse_literal(&json!(u64::MAX)).unwrap(), -1);
        assert!(FloatKind::parse_literal(&json!(1e300)).unwrap().is_infinite());
    }

    #[test]
    fn float_and_double_literals() {
        assert_eq!(FloatKind::parse_literal(&json!("1.5f")).unwrap(), 1.5);
        assert_eq!(DoubleKind::parse_literal(&json!("2.25D")).unwrap(), 2.25);
        assert_eq!(DoubleKind::parse_literal(&json!(3)).unwrap(), 3.0);
        assert!(DoubleKind::parse_literal(&json!("Sword")).is_err());
    }

    #[test]
    fn string_literal_accepts_text_and_numbers() {
        assert_eq!(StringKind::parse_literal(&json!("5")).unwrap(), "5");
        assert_eq!(StringKind::parse_literal(&json!(5)).unwrap(), "5");
        assert!(StringKind::parse_literal(&json!(true)).is_err());
    }

    #[test]
    fn construct_requires_value_field() {
        let registry = NodeRegistry::new();
        let id = NamespacedKey::builtin(INT_ID);
        let fields = Map::new();
        let err = IntNode::construct(&ctx(&registry, &id), &fields).unwrap_err();
        assert!(matches!(err, NodeError::MissingField("value")));
    }

    #[test]
    fn declared_value_does_not_affect_output() {
        let registry = NodeRegistry::new();
        let id = NamespacedKey::builtin(INT_ID);
        let node = IntNode::new(&ctx(&registry, &id), 0);
        assert_eq!(*node.declared(), 0);

        let mut input = Compound::new();
        input.set_int("Damage", 10);
        let mut output = Compound::new();
        node.visit("", "Damage", &input, &mut output).unwrap();
        assert_eq!(output.get_int("Damage"), Some(10));
    }

    #[test]
    fn string_node_copies_text() {
        let registry = NodeRegistry::new();
        let id = NamespacedKey::builtin(STRING_ID);
        let node = StringNode::new(&ctx(&registry, &id), String::new());

        let mut input = Compound::new();
        input.set_string("Damage", "lots");
        let mut output = Compound::new();
        node.visit("", "Damage", &input, &mut output).unwrap();
        assert_eq!(output.get_string("Damage"), Some("lots"));
    }
}
