//! Describe query documents and the registered node kinds

use std::path::Path;

use super::CliError;
use crate::document::QueryDocument;
use crate::registry::NodeRegistry;
use crate::value::TagKind;

/// One loaded top-level entry of a query document.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSummary {
    pub key: String,
    pub id: String,
    pub kind: TagKind,
}

/// Loads a document and summarises its entries, sorted by key.
///
/// Entries that were dropped while loading do not appear.
pub fn describe_document(
    path: &Path,
    registry: &NodeRegistry,
) -> Result<Vec<NodeSummary>, CliError> {
    let document = QueryDocument::try_load_from_file(path, registry)?;
    let mut summaries: Vec<NodeSummary> = document
        .iter()
        .map(|(key, node)| NodeSummary {
            key: key.to_string(),
            id: node.id().to_string(),
            kind: node.expected_kind(),
        })
        .collect();
    summaries.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(summaries)
}

/// Registered discriminators, one per line.
pub fn list_kinds(registry: &NodeRegistry) -> String {
    registry
        .ids()
        .into_iter()
        .map(|id| format!("{}\n", id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn describes_loaded_entries_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"b": "1b", "a": 2, "skip": [1]}}"#).unwrap();

        let summaries = describe_document(file.path(), NodeRegistry::builtin()).unwrap();
        assert_eq!(
            summaries,
            vec![
                NodeSummary {
                    key: "a".into(),
                    id: "wolfyutilities:int".into(),
                    kind: TagKind::Int,
                },
                NodeSummary {
                    key: "b".into(),
                    id: "wolfyutilities:byte".into(),
                    kind: TagKind::Byte,
                },
            ]
        );
    }

    #[test]
    fn lists_builtin_kinds() {
        let kinds = list_kinds(NodeRegistry::builtin());
        assert!(kinds.starts_with("wolfyutilities:byte\n"));
        assert!(kinds.contains("wolfyutilities:compound\n"));
        assert_eq!(kinds.lines().count(), 8);
    }
}
