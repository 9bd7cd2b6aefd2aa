// Test-only helpers for `saferoute-lib` unit tests
#![allow(dead_code)]
use crate::graph::{build_graph, Edge, Graph, Node};

/// Builder to create `Node` instances in tests with sensible defaults.
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            node: Node {
                id: id.to_string(),
                lat: 0.0,
                lng: 0.0,
                district: "Centre".to_string(),
                lighting_score: 100,
                crime_risk_score: 0,
            },
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.node.lat = lat;
        self.node.lng = lng;
        self
    }

    pub fn district(mut self, district: &str) -> Self {
        self.node.district = district.to_string();
        self
    }

    pub fn lighting(mut self, score: u8) -> Self {
        self.node.lighting_score = score;
        self
    }

    pub fn crime(mut self, score: u8) -> Self {
        self.node.crime_risk_score = score;
        self
    }

    pub fn build(self) -> Node {
        self.node
    }
}

/// Builder to create `Edge` instances in tests with sensible defaults.
pub struct EdgeBuilder {
    edge: Edge,
}

impl EdgeBuilder {
    #[must_use]
    pub fn new(id: &str, from: &str, to: &str) -> Self {
        Self {
            edge: Edge {
                id: id.to_string(),
                from: from.to_string(),
                to: to.to_string(),
                length_m: 100.0,
                avg_lighting: 100,
                incident_count: 0,
                street: format!("{from}-{to}"),
            },
        }
    }

    pub fn length(mut self, length_m: f64) -> Self {
        self.edge.length_m = length_m;
        self
    }

    pub fn lighting(mut self, avg: u8) -> Self {
        self.edge.avg_lighting = avg;
        self
    }

    pub fn incidents(mut self, count: u32) -> Self {
        self.edge.incident_count = count;
        self
    }

    pub fn build(self) -> Edge {
        self.edge
    }
}

pub fn node(id: &str, lat: f64, lng: f64) -> Node {
    NodeBuilder::new(id).at(lat, lng).build()
}

pub fn edge(id: &str, from: &str, to: &str, length_m: f64) -> Edge {
    EdgeBuilder::new(id, from, to).length(length_m).build()
}

/// A - B - C along the equator. `ab` is bright and quiet, `bc` is dark with
/// ten incidents.
pub fn line_graph() -> Graph {
    build_graph(
        vec![
            NodeBuilder::new("A").at(0.0, 0.0).lighting(90).build(),
            NodeBuilder::new("B").at(0.0, 0.0009).lighting(70).build(),
            NodeBuilder::new("C")
                .at(0.0, 0.0018)
                .lighting(30)
                .crime(50)
                .build(),
        ],
        vec![
            EdgeBuilder::new("ab", "A", "B")
                .length(100.0)
                .lighting(80)
                .build(),
            EdgeBuilder::new("bc", "B", "C")
                .length(100.0)
                .lighting(30)
                .incidents(10)
                .build(),
        ],
    )
    .expect("line graph is valid")
}
