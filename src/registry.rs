//! Discriminator → node factory registry.
//!
//! The registry is configured during initialization, before any document is
//! parsed, and only read afterwards. Third parties add node kinds with
//! [`NodeRegistry::register`]; documents referring to an unregistered
//! discriminator simply lose that entry.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::NodeError;
use crate::key::NamespacedKey;
use crate::node::QueryNode;
use crate::node::compound::{COMPOUND_ID, CompoundNode};
use crate::node::primitive::{
    ByteKind, DoubleKind, FloatKind, IntKind, LongKind, Primitive, PrimitiveNode, ShortKind,
    StringKind,
};

/// Construction context handed to a factory.
pub struct NodeContext<'a> {
    /// The resolved discriminator
    pub id: &'a NamespacedKey,
    /// Key the node is declared under
    pub key: &'a str,
    /// Dotted path of the enclosing node, empty at the document root
    pub parent_path: &'a str,
    /// Registry to resolve nested entries with
    pub registry: &'a NodeRegistry,
}

pub type NodeFactory = Box<
    dyn Fn(&NodeContext<'_>, &Map<String, Value>) -> Result<Box<dyn QueryNode>, NodeError>
        + Send
        + Sync,
>;

static BUILTIN: LazyLock<NodeRegistry> = LazyLock::new(NodeRegistry::with_builtins);

#[derive(Default)]
pub struct NodeRegistry {
    factories: HashMap<NamespacedKey, NodeFactory>,
}

impl NodeRegistry {
    /// An empty registry with no node kinds at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the primitive kinds and the compound kind.
    pub fn with_builtins() -> Self {
        let mut registry = NodeRegistry::new();
        registry.register_primitive::<ByteKind>();
        registry.register_primitive::<ShortKind>();
        registry.register_primitive::<IntKind>();
        registry.register_primitive::<LongKind>();
        registry.register_primitive::<FloatKind>();
        registry.register_primitive::<DoubleKind>();
        registry.register_primitive::<StringKind>();
        registry.register(NamespacedKey::builtin(COMPOUND_ID), CompoundNode::construct);
        registry
    }

    /// Shared registry with the built-in kinds, built on first use.
    pub fn builtin() -> &'static NodeRegistry {
        &BUILTIN
    }

    /// Registers `factory` under `id`, replacing any previous registration.
    pub fn register<F>(&mut self, id: NamespacedKey, factory: F) -> &mut Self
    where
        F: Fn(&NodeContext<'_>, &Map<String, Value>) -> Result<Box<dyn QueryNode>, NodeError>
            + Send
            + Sync
            + 'static,
    {
        if self.factories.contains_key(&id) {
            debug!(%id, "replacing node factory");
        }
        self.factories.insert(id, Box::new(factory));
        self
    }

    fn register_primitive<P: Primitive>(&mut self) -> &mut Self {
        self.register(NamespacedKey::builtin(P::ID), PrimitiveNode::<P>::construct)
    }

    pub fn resolve(&self, id: &NamespacedKey) -> Option<&NodeFactory> {
        self.factories.get(id)
    }

    pub fn contains(&self, id: &NamespacedKey) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered discriminators in sorted order.
    pub fn ids(&self) -> Vec<&NamespacedKey> {
        let mut ids: Vec<_> = self.factories.keys().collect();
        ids.sort_by_key(|id| id.to_string());
        ids
    }
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.ids()).finish()
    }
}
