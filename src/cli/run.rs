//! Execute a query document against SNBT input

use std::path::PathBuf;

use tracing::info;

use super::CliError;
use crate::document::QueryDocument;
use crate::output::{to_snbt, to_snbt_pretty};
use crate::parser::parse_compound;
use crate::registry::NodeRegistry;

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Path to the JSON query document
    pub query: PathBuf,
    /// SNBT input tree
    pub input: Option<String>,
    /// Pretty-print the output
    pub pretty: bool,
}

/// Loads the document, applies it to the input and returns the output as SNBT.
pub fn execute_run(options: &RunOptions, registry: &NodeRegistry) -> Result<String, CliError> {
    let document = QueryDocument::try_load_from_file(&options.query, registry)?;
    info!(
        query = %options.query.display(),
        nodes = document.len(),
        "loaded query document"
    );

    let text = options.input.as_deref().ok_or(CliError::NoInput)?;
    let input = parse_compound(text)?;

    let output = document.execute(&input)?;
    Ok(if options.pretty {
        to_snbt_pretty(&output)
    } else {
        to_snbt(&output)
    })
}
