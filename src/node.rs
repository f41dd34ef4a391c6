//! # Query nodes
//!
//! A query document maps each target key to a node. A node knows which tag kind
//! it expects under that key, how to read a value of that kind out of an input
//! tree and how to write it into an output tree.
//!
//! ## Module layout
//!
//! - **[primitive]** - byte, short, int, long, float, double and string nodes
//! - **[compound]** - nested compounds whose children are nodes themselves
//!
//! ## Visiting
//!
//! Every node is applied through [`Visit::visit`], which is implemented once for
//! all node types:
//!
//! 1. Look up the actual kind of `key` in the input tree.
//! 2. If the key is present with a different kind, fail with
//!    [`QueryError::TypeMismatch`] naming both kinds and the full path.
//! 3. Otherwise read the value and, if there was one, write it to the output.
//!
//! An absent key is never an error; the output simply lacks it.

pub mod compound;
pub mod primitive;

use std::fmt;

use tracing::trace;

pub use compound::CompoundNode;
pub use primitive::{
    ByteNode, DoubleNode, FloatNode, IntNode, LongNode, Primitive, PrimitiveNode, ShortNode,
    StringNode,
};

use crate::error::{QueryError, join_path};
use crate::key::NamespacedKey;
use crate::value::{Compound, Tag, TagKind};

/// The contract every node kind implements.
///
/// `path` is the dotted ancestor path of the node and is only used for
/// diagnostics and for extending the path of nested nodes.
pub trait QueryNode: fmt::Debug + Send + Sync {
    /// Discriminator this node was constructed from.
    fn id(&self) -> &NamespacedKey;

    /// Key the node was declared under.
    fn key(&self) -> &str;

    /// Ancestor path at declaration, empty for top-level entries.
    fn parent_path(&self) -> &str;

    fn expected_kind(&self) -> TagKind;

    /// Extracts the value under `key`, or `None` if the key is absent.
    ///
    /// Only called after the kind check passed. Composite nodes recurse into
    /// their children here, so this can fail with a nested mismatch.
    fn read_value(&self, path: &str, key: &str, input: &Compound)
    -> Result<Option<Tag>, QueryError>;

    fn write_value(&self, path: &str, key: &str, value: Tag, output: &mut Compound);
}

/// Type-checked extraction, shared by every [`QueryNode`].
pub trait Visit {
    fn visit(
        &self,
        path: &str,
        key: &str,
        input: &Compound,
        output: &mut Compound,
    ) -> Result<(), QueryError>;
}

impl<N: QueryNode + ?Sized> Visit for N {
    fn visit(
        &self,
        path: &str,
        key: &str,
        input: &Compound,
        output: &mut Compound,
    ) -> Result<(), QueryError> {
        let expected = self.expected_kind();
        if let Some(actual) = input.kind_of(key)
            && actual != expected
        {
            return Err(QueryError::TypeMismatch {
                expected,
                actual,
                path: join_path(path, key),
            });
        }

        trace!(path, key, kind = %expected, "visiting node");
        if let Some(value) = self.read_value(path, key, input)? {
            self.write_value(path, key, value, output);
        }
        Ok(())
    }
}
