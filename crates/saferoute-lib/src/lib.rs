//! SafeRoute library entry points.
//!
//! This crate loads a street graph annotated with lighting and incident data,
//! snaps coordinates to its nodes, and finds walking routes that trade
//! distance against perceived risk. Higher-level consumers (the CLI) should
//! only depend on the functions exported here instead of reimplementing
//! behavior.

#![deny(warnings)]

pub mod assembly;
pub mod coords;
pub mod cost;
pub mod dataset;
pub mod error;
pub mod fixture;
pub mod graph;
pub mod locator;
pub mod output;
pub mod path;
pub mod routing;
pub mod spatial;
pub mod store;

#[cfg(test)]
mod test_helpers;

pub use assembly::{assemble, RouteResult, RouteSegment, SafetyLevel, WALKING_SPEED_M_PER_MIN};
pub use coords::{haversine_distance, Coordinate, EARTH_RADIUS_M};
pub use cost::{
    edge_cost, CostModel, CostWeights, RouteOptimization, RouteOptions, TimeOfDay,
    DARK_STREET_SURCHARGE,
};
pub use dataset::{
    default_graph_path, load_graph, parse_graph, resolve_graph_path, save_graph, EdgeRecord,
    GraphDocument, GRAPH_ENV_VAR, GRAPH_FILENAME,
};
pub use error::{Error, GraphDefect, Result};
pub use fixture::{Bounds, FixtureBuilder, DEFAULT_GRID_SIZE, PLZEN_CENTER};
pub use graph::{
    build_graph, district_stats, DistrictStats, Edge, EdgeId, Graph, Neighbor, Node, NodeId,
    DARK_STREET_LIGHTING,
};
pub use locator::{nearest, LinearScanLocator, NodeLocator, Snap};
pub use output::{format_distance, format_duration, RouteRenderMode, RouteSummary};
pub use path::{find_path_a_star, find_path_dijkstra, find_route, CancelFlag, NodePath, PathStep};
pub use routing::{
    plan_route, plan_route_with, select_planner, AStarPlanner, DijkstraPlanner, RouteAlgorithm,
    RoutePlan, RoutePlanner, RouteRequest, SnappedEndpoint,
};
pub use spatial::KdTreeLocator;
pub use store::GraphStore;
