//! Nearest-node lookup for a single coordinate.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use saferoute_lib::{Coordinate, LinearScanLocator, NodeLocator};

use crate::commands::load_street_graph;
use saferoute_cli::output::{render_nearest, NearestReport, OutputFormat};
use saferoute_cli::terminal::ColorPalette;

#[derive(Debug, Clone, Args)]
pub struct NearestCommandArgs {
    /// Query point as `lat,lng`.
    #[arg(long, allow_hyphen_values = true)]
    pub at: Coordinate,
}

/// Handle the nearest subcommand.
pub fn handle_nearest_command(
    target_path: Option<&Path>,
    format: OutputFormat,
    palette: &ColorPalette,
    args: &NearestCommandArgs,
) -> Result<()> {
    let graph = load_street_graph(target_path)?;
    let snap = LinearScanLocator.locate(&graph, args.at)?;
    let node = graph
        .node(&snap.node)
        .with_context(|| format!("snapped node {} missing from graph", snap.node))?;

    let report = NearestReport {
        query: args.at,
        node: snap.node.clone(),
        position: node.position(),
        distance_m: snap.distance_m,
        district: node.district.clone(),
        lighting_score: node.lighting_score,
        crime_risk_score: node.crime_risk_score,
    };

    let mut stdout = io::stdout().lock();
    render_nearest(&mut stdout, &report, format, palette).context("failed to write result")?;
    stdout.flush().context("failed to write result")
}
