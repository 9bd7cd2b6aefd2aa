use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::info;

use crate::graph::Graph;

/// Holder of the current graph snapshot.
///
/// Readers take a [`Graph`] handle and keep using it for the whole query;
/// [`GraphStore::publish`] replaces the snapshot for later readers only.
#[derive(Debug)]
pub struct GraphStore {
    current: RwLock<Graph>,
    generation: AtomicU64,
}

impl GraphStore {
    pub fn new(graph: Graph) -> Self {
        Self {
            current: RwLock::new(graph),
            generation: AtomicU64::new(1),
        }
    }

    /// Current graph. Cheap; shares the underlying data.
    pub fn snapshot(&self) -> Graph {
        self.current.read().clone()
    }

    /// Swap in a new graph and return the previous one.
    pub fn publish(&self, graph: Graph) -> Graph {
        let nodes = graph.node_count();
        let edges = graph.edge_count();
        let previous = std::mem::replace(&mut *self.current.write(), graph);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(generation, nodes, edges, "published street graph");
        previous
    }

    /// Number of graphs published so far, starting at 1 for the initial one.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(Graph::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::line_graph;

    #[test]
    fn snapshots_survive_publish() {
        let store = GraphStore::default();
        let before = store.snapshot();
        assert!(before.is_empty());

        let previous = store.publish(line_graph());
        assert!(previous.ptr_eq(&before));
        assert!(before.is_empty());
        assert_eq!(store.snapshot().node_count(), 3);
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn store_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GraphStore>();
        assert_send_sync::<Graph>();
    }
}
