//! Per-district statistics of the loaded street graph.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use saferoute_lib::district_stats;

use crate::commands::load_street_graph;
use saferoute_cli::output::{render_stats, OutputFormat};
use saferoute_cli::terminal::ColorPalette;

/// Handle the stats subcommand.
pub fn handle_stats_command(
    target_path: Option<&Path>,
    format: OutputFormat,
    palette: &ColorPalette,
) -> Result<()> {
    let graph = load_street_graph(target_path)?;
    let stats = district_stats(&graph);
    info!(districts = stats.len(), "computed district statistics");

    let mut stdout = io::stdout().lock();
    render_stats(&mut stdout, &stats, format, palette).context("failed to write statistics")?;
    stdout.flush().context("failed to write statistics")
}
