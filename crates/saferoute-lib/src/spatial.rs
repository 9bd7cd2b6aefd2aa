//! KD-tree accelerated nearest-node lookups.
//!
//! Node positions are projected onto the unit sphere. Chord length between
//! two unit vectors grows monotonically with great-circle distance, so the
//! Euclidean nearest neighbour in 3D is the haversine nearest node. The tree
//! narrows the search to a handful of candidates; the final choice and the
//! tie-break are made on haversine distance exactly as the linear scan does.

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::{info, warn};

use crate::coords::{haversine_distance, Coordinate};
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::locator::{pick_nearest, LinearScanLocator, NodeLocator, Snap};

/// Bucket size for the KD-tree.
const BUCKET_SIZE: usize = 32;

/// Relative widening of the squared chord search window so every node that
/// could tie on haversine distance is re-ranked.
const WINDOW_REL: f64 = 1e-6;
const WINDOW_ABS: f64 = 1e-24;

/// Locator backed by a KD-tree over the nodes of one graph.
pub struct KdTreeLocator {
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    graph: Graph,
}

impl KdTreeLocator {
    /// Index every node of `graph`. The locator keeps a handle to the graph
    /// and answers queries for other graphs with a linear scan.
    pub fn build(graph: &Graph) -> Self {
        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        for (position, node) in graph.nodes().iter().enumerate() {
            tree.add(&node.position().to_unit_vector(), position);
        }

        info!(node_count = graph.node_count(), "built node KD-tree");

        Self {
            tree,
            graph: graph.clone(),
        }
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns true if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}

impl std::fmt::Debug for KdTreeLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KdTreeLocator")
            .field("nodes", &self.len())
            .finish()
    }
}

impl NodeLocator for KdTreeLocator {
    fn name(&self) -> &'static str {
        "kd-tree"
    }

    fn locate(&self, graph: &Graph, query: Coordinate) -> Result<Snap> {
        if !self.graph.ptr_eq(graph) {
            warn!("KD-tree was built for a different graph; falling back to linear scan");
            return LinearScanLocator.locate(graph, query);
        }

        let query = query.validated()?;
        if graph.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let point = query.to_unit_vector();
        let best = self
            .tree
            .nearest_n::<SquaredEuclidean>(&point, 1)
            .first()
            .map(|neighbour| neighbour.distance)
            .ok_or(Error::EmptyGraph)?;

        let window = best * (1.0 + WINDOW_REL) + WINDOW_ABS;
        let nodes = graph.nodes();
        let candidates = self
            .tree
            .within::<SquaredEuclidean>(&point, window)
            .into_iter()
            .map(|neighbour| {
                let position = neighbour.item;
                (position, haversine_distance(query, nodes[position].position()))
            });

        pick_nearest(graph, candidates).ok_or(Error::EmptyGraph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::test_helpers::node;

    #[test]
    fn agrees_with_linear_scan_on_ties() {
        let graph = build_graph(
            vec![
                node("z", 49.0, 13.001),
                node("m", 49.0, 12.999),
                node("far", 49.1, 13.0),
            ],
            vec![],
        )
        .unwrap();
        let locator = KdTreeLocator::build(&graph);
        let query = Coordinate::new(49.0, 13.0);
        assert_eq!(
            locator.locate(&graph, query).unwrap(),
            LinearScanLocator.locate(&graph, query).unwrap()
        );
        assert_eq!(locator.locate(&graph, query).unwrap().node, "m");
    }

    #[test]
    fn foreign_graph_falls_back_to_scan() {
        let indexed = build_graph(vec![node("a", 0.0, 0.0)], vec![]).unwrap();
        let other = build_graph(vec![node("b", 10.0, 10.0)], vec![]).unwrap();
        let locator = KdTreeLocator::build(&indexed);
        let snap = locator.locate(&other, Coordinate::new(10.0, 10.0)).unwrap();
        assert_eq!(snap.node, "b");
    }

    #[test]
    fn empty_index_reports_empty_graph() {
        let graph = Graph::default();
        let locator = KdTreeLocator::build(&graph);
        assert!(locator.is_empty());
        assert!(matches!(
            locator.locate(&graph, Coordinate::new(0.0, 0.0)),
            Err(Error::EmptyGraph)
        ));
    }
}
