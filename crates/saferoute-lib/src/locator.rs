//! Coordinate to nearest graph node resolution.

use serde::Serialize;

use crate::coords::{haversine_distance, Coordinate};
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId, NodeIndex};

/// Absolute slack, in meters, under which two snap distances tie.
const TIE_TOLERANCE_M: f64 = 1e-9;
/// Relative slack under which two snap distances tie.
const TIE_TOLERANCE_REL: f64 = 1e-9;

/// Node chosen for a query coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snap {
    pub node: NodeId,
    #[serde(skip)]
    pub index: NodeIndex,
    /// Great-circle distance from the query to the node.
    pub distance_m: f64,
}

/// Strategy for resolving a coordinate to the closest node of a graph.
///
/// Implementations must agree with [`LinearScanLocator`], including the
/// tie-break on the lexicographically smaller id.
pub trait NodeLocator: Send + Sync {
    fn name(&self) -> &'static str;

    fn locate(&self, graph: &Graph, query: Coordinate) -> Result<Snap>;
}

/// Haversine distance to every node. O(n) per query.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearScanLocator;

impl NodeLocator for LinearScanLocator {
    fn name(&self) -> &'static str {
        "linear-scan"
    }

    fn locate(&self, graph: &Graph, query: Coordinate) -> Result<Snap> {
        let query = query.validated()?;
        if graph.is_empty() {
            return Err(Error::EmptyGraph);
        }
        let candidates = graph.nodes().iter().enumerate().map(|(position, node)| {
            (position, haversine_distance(query, node.position()))
        });
        pick_nearest(graph, candidates).ok_or(Error::EmptyGraph)
    }
}

/// Return the id of the node closest to `(lat, lng)` using a linear scan.
pub fn nearest(lat: f64, lng: f64, graph: &Graph) -> Result<NodeId> {
    LinearScanLocator
        .locate(graph, Coordinate::new(lat, lng))
        .map(|snap| snap.node)
}

/// Choose the closest candidate; ties within tolerance go to the smaller id.
///
/// `candidates` yields `(node position, distance in meters)` and must contain
/// every node whose distance could tie with the minimum.
pub(crate) fn pick_nearest(
    graph: &Graph,
    candidates: impl IntoIterator<Item = (usize, f64)>,
) -> Option<Snap> {
    let candidates: Vec<(usize, f64)> = candidates.into_iter().collect();
    let best = candidates
        .iter()
        .map(|(_, distance)| *distance)
        .min_by(f64::total_cmp)?;
    let limit = best + TIE_TOLERANCE_M + best * TIE_TOLERANCE_REL;

    // Node positions follow id order, so the smallest position is the smallest id.
    let (position, distance) = candidates
        .into_iter()
        .filter(|(_, distance)| *distance <= limit)
        .min_by_key(|(position, _)| *position)?;

    let node = &graph.nodes()[position];
    Some(Snap {
        node: node.id.clone(),
        index: graph.index_of(&node.id)?,
        distance_m: distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::test_helpers::node;

    #[test]
    fn picks_closest_node() {
        let graph = build_graph(
            vec![node("a", 49.0, 13.0), node("b", 49.001, 13.0), node("c", 49.002, 13.0)],
            vec![],
        )
        .unwrap();
        assert_eq!(nearest(49.0012, 13.0, &graph).unwrap(), "b");
    }

    #[test]
    fn equidistant_nodes_resolve_to_smaller_id() {
        let graph = build_graph(vec![node("z", 0.0, 0.001), node("m", 0.0, -0.001)], vec![])
            .unwrap();
        assert_eq!(nearest(0.0, 0.0, &graph).unwrap(), "m");
    }

    #[test]
    fn reports_snap_distance() {
        let graph = build_graph(vec![node("a", 49.0, 13.0)], vec![]).unwrap();
        let snap = LinearScanLocator
            .locate(&graph, Coordinate::new(49.0, 13.0))
            .unwrap();
        assert_eq!(snap.node, "a");
        assert_eq!(snap.distance_m, 0.0);
    }

    #[test]
    fn empty_graph_is_an_error() {
        let error = nearest(0.0, 0.0, &Graph::default()).unwrap_err();
        assert!(matches!(error, Error::EmptyGraph));
    }

    #[test]
    fn invalid_query_is_rejected() {
        let graph = build_graph(vec![node("a", 0.0, 0.0)], vec![]).unwrap();
        assert!(matches!(
            nearest(f64::INFINITY, 0.0, &graph).unwrap_err(),
            Error::InvalidCoordinate { .. }
        ));
        assert!(matches!(
            nearest(0.0, 181.0, &graph).unwrap_err(),
            Error::InvalidCoordinate { .. }
        ));
    }
}
