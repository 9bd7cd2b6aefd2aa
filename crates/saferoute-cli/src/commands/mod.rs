// Module exports for CLI subcommands
//
// Each module handles one subcommand; main.rs parses arguments and dispatches
// to these handlers.

pub mod generate;
pub mod nearest;
pub mod route;
pub mod stats;

use std::path::Path;

use anyhow::{Context, Result};

use saferoute_lib::{load_graph, resolve_graph_path, Graph};

/// Resolve the graph document from `--graph`, `SAFEROUTE_GRAPH` or the
/// project data directory, and load it.
pub fn load_street_graph(target: Option<&Path>) -> Result<Graph> {
    let path = resolve_graph_path(target).context("failed to locate the street graph")?;
    load_graph(&path)
        .with_context(|| format!("failed to load street graph from {}", path.display()))
}
