use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::coords::{haversine_distance, Coordinate};
use crate::error::{Error, GraphDefect, Result};

/// Edges lit below this average are treated as dark streets.
pub const DARK_STREET_LIGHTING: u8 = 50;

/// Upper bound for lighting and crime scores.
const MAX_SCORE: u8 = 100;

/// Stable string identifier for a street node.
pub type NodeId = String;

/// Stable string identifier for a street segment.
pub type EdgeId = String;

/// Point in the street graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub lat: f64,
    pub lng: f64,
    pub district: String,
    /// 0-100, higher is better lit.
    #[serde(alias = "lightingScore")]
    pub lighting_score: u8,
    /// 0-100, higher means more incidents nearby.
    #[serde(alias = "crimeRisk")]
    pub crime_risk_score: u8,
}

impl Node {
    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Street segment between two nodes, traversable in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub length_m: f64,
    /// Average lighting of the two endpoints (0-100).
    pub avg_lighting: u8,
    pub incident_count: u32,
    pub street: String,
}

impl Edge {
    pub fn is_dark(&self) -> bool {
        self.avg_lighting < DARK_STREET_LIGHTING
    }
}

/// Position of a node inside a built [`Graph`]. Index order matches the
/// lexicographic order of node identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Position of an edge inside a built [`Graph`]. Index order matches the
/// lexicographic order of edge identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeIndex(usize);

impl EdgeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Adjacency entry: the incident edge and the node on its other end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacency {
    pub edge: EdgeIndex,
    pub other: NodeIndex,
}

/// Borrowed view returned by [`Graph::neighbors`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    pub edge: &'a Edge,
    pub other: &'a NodeId,
}

#[derive(Debug, Default)]
struct GraphData {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    endpoints: Vec<(NodeIndex, NodeIndex)>,
    index: HashMap<NodeId, NodeIndex>,
    adjacency: Vec<Vec<Adjacency>>,
    incident_normalizer: u32,
    heuristic_scale: f64,
}

/// Immutable street graph shared by every route query.
///
/// Cloning is cheap: all clones share one read-only allocation.
#[derive(Debug, Clone)]
pub struct Graph {
    inner: Arc<GraphData>,
}

impl Default for Graph {
    fn default() -> Self {
        Self {
            inner: Arc::new(GraphData {
                incident_normalizer: 1,
                heuristic_scale: 1.0,
                ..GraphData::default()
            }),
        }
    }
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.inner.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.nodes.is_empty()
    }

    /// Whether both handles share the same underlying graph.
    pub fn ptr_eq(&self, other: &Graph) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Nodes sorted by identifier.
    pub fn nodes(&self) -> &[Node] {
        &self.inner.nodes
    }

    /// Edges sorted by identifier.
    pub fn edges(&self) -> &[Edge] {
        &self.inner.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|index| self.node_at(index))
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.inner.index.get(id).copied()
    }

    /// Resolve a node identifier, failing with [`Error::InvalidNode`].
    pub fn require_index(&self, id: &str) -> Result<NodeIndex> {
        self.index_of(id).ok_or_else(|| Error::InvalidNode { id: id.to_string() })
    }

    pub fn node_at(&self, index: NodeIndex) -> &Node {
        &self.inner.nodes[index.0]
    }

    pub fn edge_at(&self, index: EdgeIndex) -> &Edge {
        &self.inner.edges[index.0]
    }

    pub fn position_at(&self, index: NodeIndex) -> Coordinate {
        self.node_at(index).position()
    }

    /// Resolved endpoints of an edge, in declared `from`/`to` order.
    pub fn endpoints(&self, edge: EdgeIndex) -> (NodeIndex, NodeIndex) {
        self.inner.endpoints[edge.0]
    }

    /// Incident edges of a node by index. Runs in O(1).
    pub fn adjacent(&self, node: NodeIndex) -> &[Adjacency] {
        &self.inner.adjacency[node.0]
    }

    /// Return `(edge, other node id)` pairs for every edge touching `id`.
    pub fn neighbors(&self, id: &str) -> Result<Vec<Neighbor<'_>>> {
        let index = self.require_index(id)?;
        Ok(self
            .adjacent(index)
            .iter()
            .map(|adjacency| Neighbor {
                edge: self.edge_at(adjacency.edge),
                other: &self.node_at(adjacency.other).id,
            })
            .collect())
    }

    /// Largest incident count over all edges, floored at 1.
    pub fn incident_normalizer(&self) -> u32 {
        self.inner.incident_normalizer
    }

    /// Factor applied to straight-line distance so it never exceeds the
    /// length of any edge. 1.0 unless an edge is shorter than its chord.
    pub fn heuristic_scale(&self) -> f64 {
        self.inner.heuristic_scale
    }
}

/// Validate nodes and edges and build the adjacency index.
pub fn build_graph(mut nodes: Vec<Node>, mut edges: Vec<Edge>) -> Result<Graph> {
    nodes.sort_by(|a, b| a.id.cmp(&b.id));
    edges.sort_by(|a, b| a.id.cmp(&b.id));

    let mut index = HashMap::with_capacity(nodes.len());
    for (position, node) in nodes.iter().enumerate() {
        validate_node(node)?;
        if index.insert(node.id.clone(), NodeIndex(position)).is_some() {
            return Err(GraphDefect::DuplicateNode {
                id: node.id.clone(),
            }
            .into());
        }
    }

    let mut adjacency: Vec<Vec<Adjacency>> = vec![Vec::new(); nodes.len()];
    let mut endpoints = Vec::with_capacity(edges.len());
    let mut seen_edges = HashSet::with_capacity(edges.len());
    let mut incident_normalizer = 1;
    let mut heuristic_scale: f64 = 1.0;

    for (position, edge) in edges.iter().enumerate() {
        if !seen_edges.insert(edge.id.as_str()) {
            return Err(GraphDefect::DuplicateEdge {
                id: edge.id.clone(),
            }
            .into());
        }
        let from = resolve_endpoint(&index, edge, &edge.from)?;
        let to = resolve_endpoint(&index, edge, &edge.to)?;

        if !edge.length_m.is_finite() || edge.length_m <= 0.0 {
            return Err(GraphDefect::NonPositiveLength {
                edge: edge.id.clone(),
                length_m: edge.length_m,
            }
            .into());
        }
        check_score(&edge.id, "avg_lighting", edge.avg_lighting)?;

        let edge_index = EdgeIndex(position);
        adjacency[from.0].push(Adjacency {
            edge: edge_index,
            other: to,
        });
        if from != to {
            adjacency[to.0].push(Adjacency {
                edge: edge_index,
                other: from,
            });
        }
        endpoints.push((from, to));

        incident_normalizer = incident_normalizer.max(edge.incident_count);

        let chord = haversine_distance(nodes[from.0].position(), nodes[to.0].position());
        if chord > 0.0 {
            heuristic_scale = heuristic_scale.min(edge.length_m / chord);
        }
    }

    info!(
        nodes = nodes.len(),
        edges = edges.len(),
        incident_normalizer,
        heuristic_scale,
        "built street graph"
    );

    Ok(Graph {
        inner: Arc::new(GraphData {
            nodes,
            edges,
            endpoints,
            index,
            adjacency,
            incident_normalizer,
            heuristic_scale,
        }),
    })
}

fn validate_node(node: &Node) -> Result<()> {
    if !node.position().is_valid() {
        return Err(GraphDefect::InvalidNodePosition {
            id: node.id.clone(),
            lat: node.lat,
            lng: node.lng,
        }
        .into());
    }
    check_score(&node.id, "lighting_score", node.lighting_score)?;
    check_score(&node.id, "crime_risk_score", node.crime_risk_score)
}

fn check_score(owner: &str, field: &'static str, value: u8) -> Result<()> {
    if value > MAX_SCORE {
        return Err(GraphDefect::ScoreOutOfRange {
            owner: owner.to_string(),
            field,
            value,
        }
        .into());
    }
    Ok(())
}

fn resolve_endpoint(
    index: &HashMap<NodeId, NodeIndex>,
    edge: &Edge,
    node: &NodeId,
) -> Result<NodeIndex> {
    index.get(node).copied().ok_or_else(|| {
        GraphDefect::UnknownEndpoint {
            edge: edge.id.clone(),
            node: node.clone(),
        }
        .into()
    })
}

/// Per-district aggregate over the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictStats {
    pub district: String,
    pub nodes: usize,
    pub mean_lighting: f64,
    pub mean_crime_risk: f64,
    /// Edges with both endpoints in the district.
    pub edges: usize,
    pub incidents: u64,
}

/// Aggregate lighting and crime figures per district, sorted by district.
pub fn district_stats(graph: &Graph) -> Vec<DistrictStats> {
    #[derive(Default)]
    struct Totals {
        nodes: usize,
        lighting: u64,
        crime: u64,
        edges: usize,
        incidents: u64,
    }

    let mut totals: BTreeMap<&str, Totals> = BTreeMap::new();
    for node in graph.nodes() {
        let entry = totals.entry(node.district.as_str()).or_default();
        entry.nodes += 1;
        entry.lighting += u64::from(node.lighting_score);
        entry.crime += u64::from(node.crime_risk_score);
    }

    for (position, edge) in graph.edges().iter().enumerate() {
        let (from, to) = graph.endpoints(EdgeIndex(position));
        let district = graph.node_at(from).district.as_str();
        if district != graph.node_at(to).district {
            continue;
        }
        if let Some(entry) = totals.get_mut(district) {
            entry.edges += 1;
            entry.incidents += u64::from(edge.incident_count);
        }
    }

    totals
        .into_iter()
        .map(|(district, totals)| DistrictStats {
            district: district.to_string(),
            nodes: totals.nodes,
            mean_lighting: totals.lighting as f64 / totals.nodes as f64,
            mean_crime_risk: totals.crime as f64 / totals.nodes as f64,
            edges: totals.edges,
            incidents: totals.incidents,
        })
        .collect()
}
