//! Write a seeded synthetic street graph document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use saferoute_lib::{save_graph, FixtureBuilder, DEFAULT_GRID_SIZE};

#[derive(Debug, Clone, Args)]
pub struct GenerateCommandArgs {
    /// Destination file for the graph document.
    #[arg(long)]
    pub output: PathBuf,
    /// Seed for the random generator; equal seeds give equal graphs.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
    /// Cells per side of the street grid.
    #[arg(
        long,
        default_value_t = DEFAULT_GRID_SIZE as u32,
        value_parser = clap::value_parser!(u32).range(1..=200)
    )]
    pub grid_size: u32,
}

/// Handle the generate subcommand. Always prints a one-line text report.
pub fn handle_generate_command(args: &GenerateCommandArgs) -> Result<()> {
    let graph = FixtureBuilder::new(args.seed)
        .grid_size(args.grid_size as usize)
        .build()
        .context("generated graph failed validation")?;
    save_graph(&args.output, &graph)
        .with_context(|| format!("failed to write graph to {}", args.output.display()))?;

    println!(
        "Wrote street graph with {} nodes and {} edges to {}",
        graph.node_count(),
        graph.edge_count(),
        args.output.display()
    );
    Ok(())
}
