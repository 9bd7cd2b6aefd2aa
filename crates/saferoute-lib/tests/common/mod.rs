//! Common test utilities and fixture helpers.
//!
//! This module provides shared test infrastructure for integration tests:
//! fixture graph loading, small graph builders and a brute-force reference
//! search used to check optimality.

use std::path::PathBuf;

use saferoute_lib::graph::NodeIndex;
use saferoute_lib::{load_graph, CostModel, Edge, Graph, Node};

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Load one of the JSON graph fixtures by file name.
#[allow(dead_code)]
pub fn fixture_graph(name: &str) -> Graph {
    load_graph(&fixtures_dir().join(name)).expect("fixture graph loads")
}

#[allow(dead_code)]
pub fn node(id: &str, lat: f64, lng: f64) -> Node {
    Node {
        id: id.to_string(),
        lat,
        lng,
        district: "Plzeň 1".to_string(),
        lighting_score: 80,
        crime_risk_score: 10,
    }
}

#[allow(dead_code)]
pub fn edge(id: &str, from: &str, to: &str, length_m: f64) -> Edge {
    Edge {
        id: id.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        length_m,
        avg_lighting: 80,
        incident_count: 0,
        street: "Tylova".to_string(),
    }
}

/// Cheapest simple path cost by exhaustive depth-first enumeration.
#[allow(dead_code)]
pub fn brute_force_cost(
    graph: &Graph,
    model: &CostModel,
    start: NodeIndex,
    goal: NodeIndex,
) -> Option<f64> {
    fn walk(
        graph: &Graph,
        model: &CostModel,
        current: NodeIndex,
        goal: NodeIndex,
        cost: f64,
        visited: &mut Vec<bool>,
        best: &mut Option<f64>,
    ) {
        if current == goal {
            match best {
                Some(known) if *known <= cost => {}
                _ => *best = Some(cost),
            }
            return;
        }
        for adjacency in graph.adjacent(current) {
            let next = adjacency.other;
            if visited[next.index()] {
                continue;
            }
            let step = cost + model.edge_cost(graph.edge_at(adjacency.edge));
            if best.is_some_and(|known| step >= known) {
                continue;
            }
            visited[next.index()] = true;
            walk(graph, model, next, goal, step, visited, best);
            visited[next.index()] = false;
        }
    }

    let mut visited = vec![false; graph.node_count()];
    visited[start.index()] = true;
    let mut best = None;
    walk(graph, model, start, goal, 0.0, &mut visited, &mut best);
    best
}
