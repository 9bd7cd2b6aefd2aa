use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use tracing::debug;

use crate::coords::{haversine_distance, Coordinate};
use crate::cost::{CostModel, RouteOptimization, RouteOptions};
use crate::error::{Error, Result};
use crate::graph::{EdgeIndex, Graph, NodeIndex};

/// Relative tolerance under which two path costs count as equal.
const COST_TOLERANCE: f64 = 1e-9;

/// Shrinks the A* estimate so it stays strictly below the remaining cost
/// even when floating point rounding works against it.
const HEURISTIC_SLACK: f64 = 1e-6;

/// Cooperative cancellation shared between a caller and a running search.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// One node of a found path and the edge used to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub node: NodeIndex,
    /// `None` for the first step.
    pub via: Option<EdgeIndex>,
}

/// Minimum-cost node sequence from start to goal.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePath {
    pub steps: Vec<PathStep>,
    pub cost: f64,
    /// Number of nodes settled before the goal was reached.
    pub settled: usize,
}

impl NodePath {
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.steps.iter().map(|step| step.node)
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.steps.iter().filter_map(|step| step.via)
    }

    pub fn start(&self) -> Option<NodeIndex> {
        self.steps.first().map(|step| step.node)
    }

    pub fn goal(&self) -> Option<NodeIndex> {
        self.steps.last().map(|step| step.node)
    }

    pub fn edge_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Find the safety-optimal path between two node ids with Dijkstra's
/// algorithm.
pub fn find_route(
    graph: &Graph,
    start: &str,
    goal: &str,
    options: &RouteOptions,
) -> Result<NodePath> {
    let start = graph.require_index(start)?;
    let goal = graph.require_index(goal)?;
    let model = CostModel::new(graph, options, RouteOptimization::Safety);
    find_path_dijkstra(graph, &model, start, goal, None)
}

/// Run Dijkstra's algorithm (key = accumulated cost).
pub fn find_path_dijkstra(
    graph: &Graph,
    model: &CostModel,
    start: NodeIndex,
    goal: NodeIndex,
    cancel: Option<&CancelFlag>,
) -> Result<NodePath> {
    search(graph, model, start, goal, None, cancel)
}

/// Run A* search guided by scaled great-circle distance to the goal.
pub fn find_path_a_star(
    graph: &Graph,
    model: &CostModel,
    start: NodeIndex,
    goal: NodeIndex,
    cancel: Option<&CancelFlag>,
) -> Result<NodePath> {
    let heuristic = Heuristic {
        target: graph.position_at(goal),
        scale: graph.heuristic_scale() * (1.0 - HEURISTIC_SLACK),
    };
    search(graph, model, start, goal, Some(heuristic), cancel)
}

#[derive(Debug, Clone, Copy)]
struct Heuristic {
    target: Coordinate,
    scale: f64,
}

impl Heuristic {
    fn estimate(&self, graph: &Graph, node: NodeIndex) -> f64 {
        self.scale * haversine_distance(graph.position_at(node), self.target)
    }
}

#[derive(Debug, Clone, Copy)]
struct Label {
    cost: f64,
    /// Length-weighted crime density accumulated along the path.
    exposure: f64,
    parent: Option<(NodeIndex, EdgeIndex)>,
}

#[derive(Debug, Clone, Copy)]
enum NodeState {
    Unvisited,
    Frontier(Label),
    Settled(Label),
}

impl NodeState {
    fn label(&self) -> Option<&Label> {
        match self {
            NodeState::Unvisited => None,
            NodeState::Frontier(label) | NodeState::Settled(label) => Some(label),
        }
    }
}

fn search(
    graph: &Graph,
    model: &CostModel,
    start: NodeIndex,
    goal: NodeIndex,
    heuristic: Option<Heuristic>,
    cancel: Option<&CancelFlag>,
) -> Result<NodePath> {
    if start.index() >= graph.node_count() {
        return Err(Error::InvalidNode {
            id: format!("#{}", start.index()),
        });
    }
    if goal.index() >= graph.node_count() {
        return Err(Error::InvalidNode {
            id: format!("#{}", goal.index()),
        });
    }

    if start == goal {
        return Ok(NodePath {
            steps: vec![PathStep {
                node: start,
                via: None,
            }],
            cost: 0.0,
            settled: 0,
        });
    }

    let estimate = |node: NodeIndex| heuristic.map_or(0.0, |h| h.estimate(graph, node));

    let mut states = vec![NodeState::Unvisited; graph.node_count()];
    let mut frontier = BinaryHeap::new();
    let mut settled = 0usize;

    states[start.index()] = NodeState::Frontier(Label {
        cost: 0.0,
        exposure: 0.0,
        parent: None,
    });
    frontier.push(FrontierEntry::new(start, 0.0, estimate(start)));

    while let Some(entry) = frontier.pop() {
        let label = match states[entry.node.index()] {
            NodeState::Frontier(label) => label,
            NodeState::Settled(_) | NodeState::Unvisited => continue,
        };

        if cancel.is_some_and(CancelFlag::is_cancelled) {
            debug!(settled, "route search cancelled");
            return Err(Error::SearchCancelled { settled });
        }

        states[entry.node.index()] = NodeState::Settled(label);
        settled += 1;

        if entry.node == goal {
            debug!(
                settled,
                cost = label.cost,
                a_star = heuristic.is_some(),
                "route search reached goal"
            );
            return Ok(NodePath {
                steps: reconstruct_path(&states, goal),
                cost: label.cost,
                settled,
            });
        }

        for adjacency in graph.adjacent(entry.node) {
            let next = adjacency.other;
            if matches!(states[next.index()], NodeState::Settled(_)) {
                continue;
            }

            let edge = graph.edge_at(adjacency.edge);
            let candidate = Label {
                cost: label.cost + model.edge_cost(edge),
                exposure: label.exposure + model.crime_density(edge) * edge.length_m,
                parent: Some((entry.node, adjacency.edge)),
            };

            let replace = match &states[next.index()] {
                NodeState::Frontier(current) => {
                    prefer(&states, &candidate, current) == Ordering::Less
                }
                _ => true,
            };

            if replace {
                states[next.index()] = NodeState::Frontier(candidate);
                frontier.push(FrontierEntry::new(
                    next,
                    candidate.cost,
                    candidate.cost + estimate(next),
                ));
            }
        }
    }

    debug!(settled, "route search exhausted frontier");
    Err(Error::RouteNotFound {
        start: graph.node_at(start).id.clone(),
        goal: graph.node_at(goal).id.clone(),
    })
}

/// Order two labels for the same node: cost, then crime exposure, then the
/// predecessor chain by node id, then the edge id. Crime exposure is
/// length-weighted: `Σ crime_density · length_m` over the path edges, the
/// same sum the assembler divides by distance for the average crime density.
fn prefer(states: &[NodeState], candidate: &Label, current: &Label) -> Ordering {
    if !nearly_equal(candidate.cost, current.cost) {
        return candidate.cost.total_cmp(&current.cost);
    }
    if !nearly_equal(candidate.exposure, current.exposure) {
        return candidate.exposure.total_cmp(&current.exposure);
    }
    match (candidate.parent, current.parent) {
        (Some((candidate_parent, candidate_edge)), Some((current_parent, current_edge))) => {
            if candidate_parent == current_parent {
                candidate_edge.cmp(&current_edge)
            } else {
                chain(states, candidate_parent).cmp(&chain(states, current_parent))
            }
        }
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= COST_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Node sequence from the start up to and including `node`.
fn chain(states: &[NodeState], node: NodeIndex) -> Vec<NodeIndex> {
    let mut nodes = vec![node];
    let mut current = node;
    while let Some((parent, _)) = states[current.index()].label().and_then(|label| label.parent) {
        nodes.push(parent);
        current = parent;
    }
    nodes.reverse();
    nodes
}

fn reconstruct_path(states: &[NodeState], goal: NodeIndex) -> Vec<PathStep> {
    let mut steps = Vec::new();
    let mut current = goal;
    loop {
        let parent = states[current.index()].label().and_then(|label| label.parent);
        steps.push(PathStep {
            node: current,
            via: parent.map(|(_, edge)| edge),
        });
        match parent {
            Some((node, _)) => current = node,
            None => break,
        }
    }
    steps.reverse();
    steps
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct FrontierEntry {
    node: NodeIndex,
    cost: FloatOrd,
    key: FloatOrd,
}

impl FrontierEntry {
    fn new(node: NodeIndex, cost: f64, key: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            key: FloatOrd(key),
        }
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by key.
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.cost.cmp(&self.cost))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
