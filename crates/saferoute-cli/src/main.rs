mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use saferoute_cli::output::OutputFormat;
use saferoute_cli::terminal::ColorPalette;
use saferoute_lib::{Error as LibError, GRAPH_ENV_VAR};

use commands::generate::{handle_generate_command, GenerateCommandArgs};
use commands::nearest::{handle_nearest_command, NearestCommandArgs};
use commands::route::{handle_route_command, RouteCommandArgs};
use commands::stats::handle_stats_command;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Safety-aware walking routes over lit street graphs"
)]
struct Cli {
    /// Street graph document, or a directory containing street_graph.json.
    #[arg(long, global = true)]
    graph: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Disable ANSI colors (also honoured through NO_COLOR).
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a walking route between two coordinates.
    Route(RouteCommandArgs),
    /// Show the street node closest to a coordinate.
    Nearest(NearestCommandArgs),
    /// Write a seeded synthetic street graph.
    Generate(GenerateCommandArgs),
    /// Print lighting and crime statistics per district.
    Stats,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            if let Some(hint) = error_hint(&err) {
                eprintln!("Hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let palette = ColorPalette::detect(cli.no_color);
    let graph = cli.graph.as_deref();

    match &cli.command {
        Command::Route(args) => handle_route_command(graph, cli.format, &palette, args),
        Command::Nearest(args) => handle_nearest_command(graph, cli.format, &palette, args),
        Command::Generate(args) => handle_generate_command(args),
        Command::Stats => handle_stats_command(graph, cli.format, &palette),
    }
}

/// Next step for errors the user can fix.
fn error_hint(err: &anyhow::Error) -> Option<String> {
    let hint = match err.downcast_ref::<LibError>()? {
        LibError::GraphSourceNotFound { .. } | LibError::ProjectDirsUnavailable => format!(
            "pass --graph <path> or set {GRAPH_ENV_VAR}; \
             `saferoute generate --output <path>` writes a sample graph"
        ),
        LibError::InvalidCoordinate { .. } => {
            "coordinates are decimal degrees written as lat,lng (for example 49.7477,13.3775)"
                .to_string()
        }
        LibError::EmptyGraph => "the street graph has no nodes; load a different document".to_string(),
        LibError::InvalidGraph { .. } | LibError::Json(_) => {
            "fix the graph document and run the command again".to_string()
        }
        _ => return None,
    };
    Some(hint)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
