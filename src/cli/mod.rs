//! CLI support for nbt-query
//!
//! Provides programmatic access to the `nbtq` commands so they can be embedded
//! in other tools.

mod inspect;
mod run;

pub use inspect::{NodeSummary, describe_document, list_kinds};
pub use run::{RunOptions, execute_run};

use std::io;

use thiserror::Error;

use crate::error::{LoadError, QueryError};
use crate::parser::ParseError;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot load query document: {0}")]
    Load(#[from] LoadError),

    #[error("Invalid SNBT input: {0}")]
    Parse(#[from] ParseError),

    #[error("Query failed: {0}")]
    Query(#[from] QueryError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe SNBT to stdin.")]
    NoInput,
}
