use tracing::debug;

use crate::document::QueryDocument;
use crate::error::QueryError;
use crate::node::Visit;
use crate::value::Compound;

/// Applies a query document to an input tree and returns the projected tree.
///
/// Every top-level node is visited against `input`. Keys that are absent from
/// the input are left out of the result. The first tag-kind mismatch aborts
/// the whole call; no partial result is returned. Top-level keys are visited
/// in no particular order.
///
/// `input` is only read; the returned tree is freshly allocated.
///
/// # Examples
///
/// ```
/// use nbt_query::{Compound, NodeRegistry, QueryDocument, execute};
/// use serde_json::json;
///
/// let doc = QueryDocument::parse(&json!({"Damage": "0i"}), NodeRegistry::builtin()).unwrap();
///
/// let mut item = Compound::new();
/// item.set_int("Damage", 10);
/// item.set_string("Name", "Sword");
///
/// let result = execute(&doc, &item).unwrap();
/// assert_eq!(result.get_int("Damage"), Some(10));
/// assert!(!result.contains_key("Name"));
/// ```
pub fn execute(document: &QueryDocument, input: &Compound) -> Result<Compound, QueryError> {
    let mut output = Compound::new();
    for (key, node) in document.iter() {
        node.visit("", key, input, &mut output)
            .inspect_err(|e| debug!(error = %e, "query execution aborted"))?;
    }
    debug!(nodes = document.len(), projected = output.len(), "query executed");
    Ok(output)
}
