//! Route command handler for computing walks between two coordinates.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use saferoute_lib::{
    plan_route_with, Coordinate, Error as RouteError, KdTreeLocator, RouteAlgorithm,
    RouteOptimization, RouteOptions, RouteRequest, RouteSummary, TimeOfDay,
};

use crate::commands::load_street_graph;
use saferoute_cli::output::{render_route, OutputFormat};
use saferoute_cli::terminal::ColorPalette;

/// Arguments for the route command.
#[derive(Debug, Clone, Args)]
pub struct RouteCommandArgs {
    /// Starting point as `lat,lng`.
    #[arg(long, allow_hyphen_values = true)]
    pub from: Coordinate,
    /// Destination as `lat,lng`.
    #[arg(long, allow_hyphen_values = true)]
    pub to: Coordinate,
    /// Weigh lighting and crime more heavily.
    #[arg(long)]
    pub prioritize_safety: bool,
    /// Heavily penalize streets lit below 50.
    #[arg(long)]
    pub avoid_dark_streets: bool,
    /// Time of day of the walk.
    #[arg(long, value_enum, conflicts_with = "hour")]
    pub time_of_day: Option<TimeOfDayArg>,
    /// Hour of the walk (0-23); 20:00 to 05:59 counts as night.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=23))]
    pub hour: Option<u32>,
    /// Search algorithm.
    #[arg(long, value_enum, default_value_t = AlgorithmArg::AStar)]
    pub algorithm: AlgorithmArg,
    /// Objective to minimize.
    #[arg(long = "optimize", value_enum, default_value_t = OptimizeArg::Safety)]
    pub optimize: OptimizeArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeOfDayArg {
    Day,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    Dijkstra,
    AStar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptimizeArg {
    Safety,
    Distance,
}

impl RouteCommandArgs {
    pub fn time_of_day(&self) -> TimeOfDay {
        match (self.time_of_day, self.hour) {
            (Some(TimeOfDayArg::Night), _) => TimeOfDay::Night,
            (Some(TimeOfDayArg::Day), _) => TimeOfDay::Day,
            (None, Some(hour)) => TimeOfDay::from_hour(hour),
            (None, None) => TimeOfDay::Day,
        }
    }

    /// Convert CLI args to a library RouteRequest.
    pub fn to_request(&self) -> RouteRequest {
        RouteRequest::new(self.from, self.to)
            .with_options(RouteOptions {
                prioritize_safety: self.prioritize_safety,
                avoid_dark_streets: self.avoid_dark_streets,
                time_of_day: self.time_of_day(),
            })
            .with_algorithm(match self.algorithm {
                AlgorithmArg::Dijkstra => RouteAlgorithm::Dijkstra,
                AlgorithmArg::AStar => RouteAlgorithm::AStar,
            })
            .with_optimization(match self.optimize {
                OptimizeArg::Safety => RouteOptimization::Safety,
                OptimizeArg::Distance => RouteOptimization::Distance,
            })
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(
    target_path: Option<&Path>,
    format: OutputFormat,
    palette: &ColorPalette,
    args: &RouteCommandArgs,
) -> Result<()> {
    let graph = load_street_graph(target_path)?;
    let locator = KdTreeLocator::build(&graph);
    let request = args.to_request();

    let plan = match plan_route_with(&graph, &locator, &request) {
        Ok(plan) => plan,
        Err(err) => return Err(handle_route_failure(err)),
    };

    let summary = RouteSummary::from_plan(&plan);
    let mut stdout = io::stdout().lock();
    render_route(&mut stdout, &summary, format, palette).context("failed to write route")?;
    stdout.flush().context("failed to write route")
}

fn handle_route_failure(err: RouteError) -> anyhow::Error {
    match err {
        RouteError::RouteNotFound { start, goal } => {
            anyhow::anyhow!(format_route_not_found_message(&start, &goal))
        }
        other => anyhow::Error::new(other),
    }
}

fn format_route_not_found_message(start: &str, goal: &str) -> String {
    format!(
        "No route found between {start} and {goal}. The points lie on disconnected parts \
         of the street network; try points closer together or check `saferoute stats`."
    )
}
