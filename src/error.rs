//! Error types for loading and executing query documents.
//!
//! Loading has two tiers: [`NodeError`] rejects a single entry (which is then
//! dropped from the document) while [`LoadError`] means the whole source was
//! unreadable. Execution fails with [`QueryError`], which aborts the call.

use std::io;

use thiserror::Error;

use crate::key::InvalidKey;
use crate::value::TagKind;

/// Why a single document entry could not be turned into a node.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error(transparent)]
    InvalidKey(#[from] InvalidKey),

    #[error("unknown node type '{0}'")]
    UnknownType(String),

    #[error("cannot infer a node type from this value")]
    Uninferable,

    #[error("invalid {kind} literal '{literal}'")]
    InvalidLiteral { kind: TagKind, literal: String },
}

/// Failure to read a query document source as a whole.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("query document root must be a JSON object")]
    NotAnObject,
}

/// Failure while applying a document to an input tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("mismatched tag kinds: requested {expected} but found {actual}, at node {path}")]
    TypeMismatch {
        expected: TagKind,
        actual: TagKind,
        path: String,
    },
}

/// Joins an ancestor path and a key into the full dotted path of a node.
pub fn join_path(parent_path: &str, key: &str) -> String {
    if parent_path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent_path, key)
    }
}
