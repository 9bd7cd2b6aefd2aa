//! Route planning strategies.
//!
//! This module provides the `RoutePlanner` trait and its Dijkstra and A*
//! implementations. Both minimize the same cost model and apply the same
//! tie-breaks, so they return identical paths; A* settles fewer nodes.

use crate::cost::{CostModel, RouteOptimization, RouteOptions};
use crate::error::Result;
use crate::graph::{Graph, NodeIndex};
use crate::path::{find_path_a_star, find_path_dijkstra, CancelFlag, NodePath};

use super::{RouteAlgorithm, RouteRequest};

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Objective the planner minimizes.
    fn optimization(&self) -> RouteOptimization;

    /// Execute the search between two resolved nodes.
    fn find_path(
        &self,
        graph: &Graph,
        start: NodeIndex,
        goal: NodeIndex,
        options: &RouteOptions,
        cancel: Option<&CancelFlag>,
    ) -> Result<NodePath>;
}

/// Dijkstra's algorithm planner.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner {
    optimization: RouteOptimization,
}

impl DijkstraPlanner {
    pub fn new(optimization: RouteOptimization) -> Self {
        Self { optimization }
    }

    /// Create a safety-optimizing Dijkstra planner.
    pub fn safety() -> Self {
        Self::new(RouteOptimization::Safety)
    }

    /// Create a distance-optimizing Dijkstra planner.
    pub fn distance() -> Self {
        Self::new(RouteOptimization::Distance)
    }
}

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn optimization(&self) -> RouteOptimization {
        self.optimization
    }

    fn find_path(
        &self,
        graph: &Graph,
        start: NodeIndex,
        goal: NodeIndex,
        options: &RouteOptions,
        cancel: Option<&CancelFlag>,
    ) -> Result<NodePath> {
        let model = CostModel::new(graph, options, self.optimization);
        find_path_dijkstra(graph, &model, start, goal, cancel)
    }
}

/// A* planner guided by great-circle distance to the goal.
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner {
    optimization: RouteOptimization,
}

impl AStarPlanner {
    pub fn new(optimization: RouteOptimization) -> Self {
        Self { optimization }
    }

    /// Create a safety-optimizing A* planner.
    pub fn safety() -> Self {
        Self::new(RouteOptimization::Safety)
    }

    /// Create a distance-optimizing A* planner.
    pub fn distance() -> Self {
        Self::new(RouteOptimization::Distance)
    }
}

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn optimization(&self) -> RouteOptimization {
        self.optimization
    }

    fn find_path(
        &self,
        graph: &Graph,
        start: NodeIndex,
        goal: NodeIndex,
        options: &RouteOptions,
        cancel: Option<&CancelFlag>,
    ) -> Result<NodePath> {
        let model = CostModel::new(graph, options, self.optimization);
        find_path_a_star(graph, &model, start, goal, cancel)
    }
}

/// Select the appropriate planner for a given request.
pub fn select_planner(request: &RouteRequest) -> Box<dyn RoutePlanner> {
    match request.algorithm {
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner::new(request.optimization)),
        RouteAlgorithm::AStar => Box::new(AStarPlanner::new(request.optimization)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Coordinate;
    use crate::test_helpers::line_graph;

    #[test]
    fn dijkstra_planner_returns_correct_algorithm() {
        let planner = DijkstraPlanner::distance();
        assert_eq!(planner.algorithm(), RouteAlgorithm::Dijkstra);
        assert_eq!(planner.optimization(), RouteOptimization::Distance);
    }

    #[test]
    fn a_star_planner_returns_correct_algorithm() {
        let planner = AStarPlanner::safety();
        assert_eq!(planner.algorithm(), RouteAlgorithm::AStar);
        assert_eq!(planner.optimization(), RouteOptimization::Safety);
    }

    #[test]
    fn select_planner_follows_request() {
        let mut request =
            RouteRequest::new(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 0.0018));
        request.algorithm = RouteAlgorithm::Dijkstra;
        request.optimization = RouteOptimization::Distance;
        let planner = select_planner(&request);
        assert_eq!(planner.algorithm(), RouteAlgorithm::Dijkstra);
        assert_eq!(planner.optimization(), RouteOptimization::Distance);

        request.algorithm = RouteAlgorithm::AStar;
        assert_eq!(select_planner(&request).algorithm(), RouteAlgorithm::AStar);
    }

    #[test]
    fn planners_agree_on_line() {
        let graph = line_graph();
        let start = graph.index_of("A").unwrap();
        let goal = graph.index_of("C").unwrap();
        let options = RouteOptions::default();
        let dijkstra = DijkstraPlanner::safety()
            .find_path(&graph, start, goal, &options, None)
            .unwrap();
        let a_star = AStarPlanner::safety()
            .find_path(&graph, start, goal, &options, None)
            .unwrap();
        assert_eq!(dijkstra.steps, a_star.steps);
    }
}
