pub mod cli;
pub mod document;
pub mod engine;
pub mod error;
pub mod infer;
pub mod key;
pub mod lexer;
pub mod node;
pub mod output;
pub mod parser;
pub mod registry;
pub mod value;

pub use document::QueryDocument;
pub use engine::execute;
pub use error::{LoadError, NodeError, QueryError};
pub use key::NamespacedKey;
pub use node::{QueryNode, Visit};
pub use output::{to_snbt, to_snbt_pretty};
pub use parser::{ParseError, parse_compound};
pub use registry::{NodeContext, NodeFactory, NodeRegistry};
pub use value::{Compound, Tag, TagKind};
