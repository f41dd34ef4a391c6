//! Discriminator inference for bare scalar entries of a query document.
//!
//! A document may write `"Damage": "10i"` instead of the object form
//! `{"id": "wolfyutilities:int", "value": "10i"}`. The scalar's shape decides
//! which node kind it stands for.

use crate::key::NamespacedKey;
use crate::node::primitive::{
    BYTE_ID, DOUBLE_ID, FLOAT_ID, INT_ID, LONG_ID, SHORT_ID, STRING_ID,
};

/// The minimal description of a scalar needed for inference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarShape<'a> {
    Text(&'a str),
    /// A number without a fractional part
    Integer,
    Float,
    /// Objects, arrays, booleans, null and integers wider than 64 bits
    Other,
}

impl<'a> ScalarShape<'a> {
    pub fn of(value: &'a serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => ScalarShape::Text(s),
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => ScalarShape::Integer,
            serde_json::Value::Number(n) if is_integral_text(&n.to_string()) => ScalarShape::Other,
            serde_json::Value::Number(_) => ScalarShape::Float,
            _ => ScalarShape::Other,
        }
    }
}

/// Numbers keep their source text, so `5.0` and `1e3` stay distinguishable
/// from integer literals that overflow 64 bits.
fn is_integral_text(text: &str) -> bool {
    !text.contains(['.', 'e', 'E'])
}

/// Returns the discriminator of the node kind a bare scalar stands for.
///
/// Text is classified by its last character only, so `"5"` is a string node
/// while `"5b"` is a byte node. Numbers map to `int` or `double`.
///
/// # Examples
///
/// ```
/// use nbt_query::infer::{infer_discriminator, ScalarShape};
///
/// let id = infer_discriminator(ScalarShape::Text("5b")).unwrap();
/// assert_eq!(id.to_string(), "wolfyutilities:byte");
///
/// let id = infer_discriminator(ScalarShape::Text("5")).unwrap();
/// assert_eq!(id.to_string(), "wolfyutilities:string");
///
/// assert!(infer_discriminator(ScalarShape::Other).is_none());
/// ```
pub fn infer_discriminator(shape: ScalarShape<'_>) -> Option<NamespacedKey> {
    let path = match shape {
        ScalarShape::Text(text) => match text.chars().last().map(|c| c.to_ascii_lowercase()) {
            Some('b') => BYTE_ID,
            Some('s') => SHORT_ID,
            Some('i') => INT_ID,
            Some('l') => LONG_ID,
            Some('f') => FLOAT_ID,
            Some('d') => DOUBLE_ID,
            _ => STRING_ID,
        },
        ScalarShape::Integer => INT_ID,
        ScalarShape::Float => DOUBLE_ID,
        ScalarShape::Other => return None,
    };
    Some(NamespacedKey::builtin(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn infer(value: serde_json::Value) -> Option<String> {
        infer_discriminator(ScalarShape::of(&value)).map(|k| k.path().to_string())
    }

    #[test]
    fn text_suffixes() {
        assert_eq!(infer(json!("5b")).as_deref(), Some("byte"));
        assert_eq!(infer(json!("5S")).as_deref(), Some("short"));
        assert_eq!(infer(json!("5i")).as_deref(), Some("int"));
        assert_eq!(infer(json!("5L")).as_deref(), Some("long"));
        assert_eq!(infer(json!("1.5f")).as_deref(), Some("float"));
        assert_eq!(infer(json!("1.5D")).as_deref(), Some("double"));
    }

    #[test]
    fn unsuffixed_text_is_string() {
        assert_eq!(infer(json!("5")).as_deref(), Some("string"));
        assert_eq!(infer(json!("hello")).as_deref(), Some("string"));
        assert_eq!(infer(json!("")).as_deref(), Some("string"));
    }

    #[test]
    fn numbers() {
        assert_eq!(infer(json!(5)).as_deref(), Some("int"));
        assert_eq!(infer(json!(5.0)).as_deref(), Some("double"));
        assert_eq!(infer(json!(-3.25)).as_deref(), Some("double"));
        assert_eq!(infer(json!(u64::MAX)).as_deref(), Some("int"));
    }

    #[test]
    fn integers_wider_than_64_bits_are_dropped() {
        let big: serde_json::Value = serde_json::from_str("100000000000000000000").unwrap();
        assert_eq!(infer(big), None);

        let exponent: serde_json::Value = serde_json::from_str("1e20").unwrap();
        assert_eq!(infer(exponent).as_deref(), Some("double"));
    }

    #[test]
    fn other_shapes_are_dropped() {
        assert_eq!(infer(json!([1, 2, 3])), None);
        assert_eq!(infer(json!({"id": "x"})), None);
        assert_eq!(infer(json!(true)), None);
        assert_eq!(infer(json!(null)), None);
    }
}
