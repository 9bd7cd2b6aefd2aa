//! Turn a node path into a walking route with safety metrics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coords::Coordinate;
use crate::cost::{CostModel, RouteOptimization, RouteOptions, DARK_STREET_SURCHARGE};
use crate::graph::{EdgeId, Graph, NodeId};
use crate::path::NodePath;

/// Average walking pace in meters per minute.
pub const WALKING_SPEED_M_PER_MIN: f64 = 80.0;

/// Qualitative band of a safety score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyLevel {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl SafetyLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => SafetyLevel::VeryHigh,
            60..=79 => SafetyLevel::High,
            40..=59 => SafetyLevel::Medium,
            20..=39 => SafetyLevel::Low,
            _ => SafetyLevel::VeryLow,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SafetyLevel::VeryHigh => "Very high",
            SafetyLevel::High => "High",
            SafetyLevel::Medium => "Medium",
            SafetyLevel::Low => "Low",
            SafetyLevel::VeryLow => "Very low",
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One traversed street segment, oriented in walking direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub edge: EdgeId,
    pub street: String,
    pub from: NodeId,
    pub to: NodeId,
    pub length_m: f64,
    pub avg_lighting: u8,
    pub incident_count: u32,
    pub dark: bool,
}

/// Walking route between two nodes and its metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub nodes: Vec<NodeId>,
    pub coordinates: Vec<Coordinate>,
    pub segments: Vec<RouteSegment>,
    pub total_distance_m: f64,
    pub estimated_time_min: u32,
    /// Distance-weighted edge lighting, 0-100.
    pub lighting_coverage: u8,
    pub safety_score: u8,
    pub safety_level: SafetyLevel,
    /// Meters walked on edges lit below 50.
    pub dark_distance_m: f64,
    /// Districts crossed, consecutive repeats collapsed.
    pub districts: Vec<String>,
}

impl RouteResult {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// Build the route and its metrics for a found path.
pub fn assemble(graph: &Graph, path: &NodePath, options: &RouteOptions) -> RouteResult {
    let model = CostModel::new(graph, options, RouteOptimization::Safety);
    let weights = model.weights();

    let mut nodes = Vec::with_capacity(path.steps.len());
    let mut coordinates = Vec::with_capacity(path.steps.len());
    let mut districts: Vec<String> = Vec::new();
    for index in path.nodes() {
        let node = graph.node_at(index);
        nodes.push(node.id.clone());
        coordinates.push(node.position());
        if districts.last() != Some(&node.district) {
            districts.push(node.district.clone());
        }
    }

    let mut segments = Vec::with_capacity(path.edge_count());
    let mut total_distance_m = 0.0;
    let mut lit_distance = 0.0;
    let mut crime_distance = 0.0;
    let mut dark_distance_m = 0.0;
    for pair in path.steps.windows(2) {
        let Some(edge_index) = pair[1].via else {
            continue;
        };
        let edge = graph.edge_at(edge_index);
        total_distance_m += edge.length_m;
        lit_distance += f64::from(edge.avg_lighting) * edge.length_m;
        crime_distance += model.crime_density(edge) * edge.length_m;
        if edge.is_dark() {
            dark_distance_m += edge.length_m;
        }
        segments.push(RouteSegment {
            edge: edge.id.clone(),
            street: edge.street.clone(),
            from: graph.node_at(pair[0].node).id.clone(),
            to: graph.node_at(pair[1].node).id.clone(),
            length_m: edge.length_m,
            avg_lighting: edge.avg_lighting,
            incident_count: edge.incident_count,
            dark: edge.is_dark(),
        });
    }

    let (coverage, avg_crime, dark_share) = if total_distance_m > 0.0 {
        (
            (lit_distance / total_distance_m).round(),
            crime_distance / total_distance_m,
            dark_distance_m / total_distance_m,
        )
    } else {
        (100.0, 0.0, 0.0)
    };

    let mut deduction =
        weights.light * 100.0 * (1.0 - coverage / 100.0) + weights.crime * 100.0 * avg_crime;
    if options.avoid_dark_streets {
        deduction += DARK_STREET_SURCHARGE * 100.0 * dark_share;
    }
    let safety_score = (100.0 - deduction).clamp(0.0, 100.0).round() as u8;

    RouteResult {
        nodes,
        coordinates,
        segments,
        total_distance_m,
        estimated_time_min: estimated_time(total_distance_m),
        lighting_coverage: coverage.clamp(0.0, 100.0) as u8,
        safety_score,
        safety_level: SafetyLevel::from_score(safety_score),
        dark_distance_m,
        districts,
    }
}

/// Whole minutes at walking pace; at least one minute for any movement.
pub fn estimated_time(distance_m: f64) -> u32 {
    if distance_m <= 0.0 {
        return 0;
    }
    ((distance_m / WALKING_SPEED_M_PER_MIN).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::TimeOfDay;
    use crate::path::find_route;
    use crate::test_helpers::line_graph;

    #[test]
    fn line_route_metrics() {
        let graph = line_graph();
        let options = RouteOptions::default();
        let path = find_route(&graph, "A", "C", &options).unwrap();
        let route = assemble(&graph, &path, &options);

        assert_eq!(route.nodes, vec!["A", "B", "C"]);
        assert_eq!(route.total_distance_m, 200.0);
        assert_eq!(route.estimated_time_min, 3);
        assert_eq!(route.lighting_coverage, 55);
        // 100 - (0.4 * 45 + 0.6 * 50)
        assert_eq!(route.safety_score, 52);
        assert_eq!(route.safety_level, SafetyLevel::Medium);
        assert_eq!(route.dark_distance_m, 100.0);
        assert_eq!(route.segments[1].from, "B");
        assert!(route.segments[1].dark);
    }

    #[test]
    fn avoiding_dark_streets_lowers_score() {
        let graph = line_graph();
        let options = RouteOptions {
            avoid_dark_streets: true,
            ..RouteOptions::default()
        };
        let path = find_route(&graph, "A", "C", &options).unwrap();
        let route = assemble(&graph, &path, &options);
        assert_eq!(route.safety_score, 0);
        assert_eq!(route.safety_level, SafetyLevel::VeryLow);
    }

    #[test]
    fn night_weights_flow_into_score() {
        let graph = line_graph();
        let options = RouteOptions {
            time_of_day: TimeOfDay::Night,
            ..RouteOptions::default()
        };
        let path = find_route(&graph, "A", "C", &options).unwrap();
        let route = assemble(&graph, &path, &options);
        // 100 - (0.6 * 45 + 0.6 * 50)
        assert_eq!(route.safety_score, 43);
    }

    #[test]
    fn zero_length_route() {
        let graph = line_graph();
        let options = RouteOptions::default();
        let path = find_route(&graph, "B", "B", &options).unwrap();
        let route = assemble(&graph, &path, &options);
        assert_eq!(route.total_distance_m, 0.0);
        assert_eq!(route.estimated_time_min, 0);
        assert_eq!(route.lighting_coverage, 100);
        assert_eq!(route.safety_score, 100);
        assert_eq!(route.coordinates.len(), 1);
        assert!(route.segments.is_empty());
    }

    #[test]
    fn short_walks_take_at_least_a_minute() {
        assert_eq!(estimated_time(10.0), 1);
        assert_eq!(estimated_time(0.0), 0);
        assert_eq!(estimated_time(800.0), 10);
    }

    #[test]
    fn safety_bands() {
        assert_eq!(SafetyLevel::from_score(80), SafetyLevel::VeryHigh);
        assert_eq!(SafetyLevel::from_score(79), SafetyLevel::High);
        assert_eq!(SafetyLevel::from_score(40), SafetyLevel::Medium);
        assert_eq!(SafetyLevel::from_score(20), SafetyLevel::Low);
        assert_eq!(SafetyLevel::from_score(19), SafetyLevel::VeryLow);
    }
}
