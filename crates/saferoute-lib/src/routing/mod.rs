//! Route planning for safety-aware walking routes.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported search algorithms (Dijkstra, A*)
//! - [`RouteRequest`] - Two coordinates plus routing preferences
//! - [`RoutePlan`] - Snapped endpoints and the assembled route
//! - [`plan_route`] - Main entry point for computing routes
//!
//! # Strategy Pattern
//!
//! Each algorithm is encapsulated in a [`RoutePlanner`]. Node resolution is a
//! second seam: [`plan_route_with`] accepts any [`NodeLocator`].
//!
//! # Example
//!
//! ```no_run
//! use saferoute_lib::{load_graph, plan_route, Coordinate, RouteRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = load_graph(std::path::Path::new("street_graph.json"))?;
//! let request = RouteRequest::new(
//!     Coordinate::new(49.7477, 13.3775),
//!     Coordinate::new(49.7384, 13.3736),
//! );
//! let plan = plan_route(&graph, &request)?;
//! println!("{} m, safety {}", plan.route.total_distance_m, plan.route.safety_score);
//! # Ok(())
//! # }
//! ```

mod planner;

pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RoutePlanner};

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::assembly::{assemble, RouteResult};
use crate::coords::Coordinate;
use crate::cost::{RouteOptimization, RouteOptions};
use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::locator::{LinearScanLocator, NodeLocator, Snap};
use crate::path::CancelFlag;

/// Snaps farther than this from the query point are logged.
pub const FAR_SNAP_WARNING_M: f64 = 250.0;

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// Dijkstra's algorithm.
    Dijkstra,
    /// A* search guided by great-circle distance.
    #[default]
    #[serde(rename = "a-star")]
    AStar,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::Dijkstra => "dijkstra",
            RouteAlgorithm::AStar => "a-star",
        };
        f.write_str(value)
    }
}

/// High-level route planning request.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub from: Coordinate,
    pub to: Coordinate,
    pub options: RouteOptions,
    pub algorithm: RouteAlgorithm,
    pub optimization: RouteOptimization,
    /// Raised by the caller to abort the search.
    pub cancel: Option<CancelFlag>,
}

impl RouteRequest {
    /// Request with default options: A*, safety objective.
    pub fn new(from: Coordinate, to: Coordinate) -> Self {
        Self {
            from,
            to,
            options: RouteOptions::default(),
            algorithm: RouteAlgorithm::default(),
            optimization: RouteOptimization::default(),
            cancel: None,
        }
    }

    pub fn with_options(mut self, options: RouteOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_optimization(mut self, optimization: RouteOptimization) -> Self {
        self.optimization = optimization;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Query coordinate and the node it resolved to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnappedEndpoint {
    pub query: Coordinate,
    pub node: NodeId,
    pub snap_distance_m: f64,
}

/// Planned route returned by the library.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub algorithm: RouteAlgorithm,
    pub optimization: RouteOptimization,
    pub options: RouteOptions,
    pub start: SnappedEndpoint,
    pub goal: SnappedEndpoint,
    pub route: RouteResult,
    /// Nodes settled by the search.
    pub settled_nodes: usize,
}

impl RoutePlan {
    /// Number of street segments walked.
    pub fn hop_count(&self) -> usize {
        self.route.segments.len()
    }
}

/// Compute a route using the linear-scan locator.
pub fn plan_route(graph: &Graph, request: &RouteRequest) -> Result<RoutePlan> {
    plan_route_with(graph, &LinearScanLocator, request)
}

/// Compute a route, resolving endpoints with `locator`.
pub fn plan_route_with(
    graph: &Graph,
    locator: &dyn NodeLocator,
    request: &RouteRequest,
) -> Result<RoutePlan> {
    // Step 1: Snap both coordinates to graph nodes
    let start = snap(graph, locator, request.from, "start")?;
    let goal = snap(graph, locator, request.to, "goal")?;

    // Step 2: Run the selected search strategy
    let planner = select_planner(request);
    let path = planner.find_path(
        graph,
        start.index,
        goal.index,
        &request.options,
        request.cancel.as_ref(),
    )?;

    debug!(
        algorithm = %planner.algorithm(),
        optimization = %planner.optimization(),
        start = %start.node,
        goal = %goal.node,
        settled = path.settled,
        "planned route"
    );

    // Step 3: Assemble the route metrics
    let route = assemble(graph, &path, &request.options);

    Ok(RoutePlan {
        algorithm: planner.algorithm(),
        optimization: planner.optimization(),
        options: request.options,
        start: SnappedEndpoint {
            query: request.from,
            node: start.node,
            snap_distance_m: start.distance_m,
        },
        goal: SnappedEndpoint {
            query: request.to,
            node: goal.node,
            snap_distance_m: goal.distance_m,
        },
        route,
        settled_nodes: path.settled,
    })
}

fn snap(
    graph: &Graph,
    locator: &dyn NodeLocator,
    query: Coordinate,
    role: &'static str,
) -> Result<Snap> {
    let snap = locator.locate(graph, query)?;
    if snap.distance_m > FAR_SNAP_WARNING_M {
        warn!(
            role,
            node = %snap.node,
            distance_m = snap.distance_m,
            locator = locator.name(),
            "query point is far from the street network"
        );
    }
    Ok(snap)
}
