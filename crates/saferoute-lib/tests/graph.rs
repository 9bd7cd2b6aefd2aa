mod common;

use common::{edge, fixture_graph, node};
use saferoute_lib::{build_graph, district_stats, Error, GraphDefect};

fn defect(result: saferoute_lib::Result<saferoute_lib::Graph>) -> GraphDefect {
    match result {
        Err(Error::InvalidGraph { defect }) => defect,
        other => panic!("expected InvalidGraph, got {other:?}"),
    }
}

#[test]
fn unknown_endpoint_is_rejected() {
    let result = build_graph(
        vec![node("a", 49.74, 13.37)],
        vec![edge("e1", "a", "ghost", 50.0)],
    );
    assert_eq!(
        defect(result),
        GraphDefect::UnknownEndpoint {
            edge: "e1".to_string(),
            node: "ghost".to_string(),
        }
    );
}

#[test]
fn non_positive_length_is_rejected() {
    let nodes = || vec![node("a", 49.74, 13.37), node("b", 49.741, 13.37)];
    for length in [0.0, -3.0, f64::NAN] {
        let result = build_graph(nodes(), vec![edge("e1", "a", "b", length)]);
        assert!(matches!(
            defect(result),
            GraphDefect::NonPositiveLength { ref edge, .. } if edge == "e1"
        ));
    }
}

#[test]
fn duplicate_ids_are_rejected() {
    let result = build_graph(
        vec![node("a", 49.74, 13.37), node("a", 49.75, 13.37)],
        vec![],
    );
    assert_eq!(
        defect(result),
        GraphDefect::DuplicateNode {
            id: "a".to_string()
        }
    );

    let result = build_graph(
        vec![node("a", 49.74, 13.37), node("b", 49.741, 13.37)],
        vec![edge("e1", "a", "b", 100.0), edge("e1", "b", "a", 120.0)],
    );
    assert_eq!(
        defect(result),
        GraphDefect::DuplicateEdge {
            id: "e1".to_string()
        }
    );
}

#[test]
fn scores_above_hundred_are_rejected() {
    let mut bright = node("a", 49.74, 13.37);
    bright.lighting_score = 101;
    assert!(matches!(
        defect(build_graph(vec![bright], vec![])),
        GraphDefect::ScoreOutOfRange {
            field: "lighting_score",
            value: 101,
            ..
        }
    ));

    let mut lit = edge("e1", "a", "b", 100.0);
    lit.avg_lighting = 200;
    assert!(matches!(
        defect(build_graph(
            vec![node("a", 49.74, 13.37), node("b", 49.741, 13.37)],
            vec![lit],
        )),
        GraphDefect::ScoreOutOfRange {
            field: "avg_lighting",
            ..
        }
    ));
}

#[test]
fn invalid_node_position_is_rejected() {
    let result = build_graph(vec![node("a", 95.0, 13.37)], vec![]);
    assert!(matches!(
        defect(result),
        GraphDefect::InvalidNodePosition { ref id, .. } if id == "a"
    ));
}

#[test]
fn parallel_edges_are_kept() {
    let graph = fixture_graph("parallel_streets.json");
    assert_eq!(graph.edge_count(), 2);
    let neighbours = graph.neighbors("S").unwrap();
    assert_eq!(neighbours.len(), 2);
    assert!(neighbours.iter().all(|n| n.other == "T"));
}

#[test]
fn neighbors_are_symmetric() {
    let graph = fixture_graph("three_node_line.json");
    for node in graph.nodes() {
        for neighbour in graph.neighbors(&node.id).unwrap() {
            let back = graph.neighbors(neighbour.other).unwrap();
            assert!(back
                .iter()
                .any(|n| n.edge.id == neighbour.edge.id && *n.other == node.id));
        }
    }
    assert!(matches!(
        graph.neighbors("Z"),
        Err(Error::InvalidNode { ref id }) if id == "Z"
    ));
}

#[test]
fn derived_edge_lighting_uses_endpoint_mean() {
    let graph = fixture_graph("disconnected.json");
    let e1 = graph.edges().iter().find(|e| e.id == "e1").unwrap();
    let e2 = graph.edges().iter().find(|e| e.id == "e2").unwrap();
    assert_eq!(e1.avg_lighting, 78);
    assert_eq!(e2.avg_lighting, 50);
    assert!(!e2.is_dark());
}

#[test]
fn district_stats_for_line_fixture() {
    let graph = fixture_graph("three_node_line.json");
    let stats = district_stats(&graph);
    assert_eq!(stats.len(), 2);

    let centre = &stats[0];
    assert_eq!(centre.district, "Plzeň 1");
    assert_eq!(centre.nodes, 2);
    assert_eq!(centre.mean_lighting, 80.0);
    assert_eq!(centre.mean_crime_risk, 12.5);
    assert_eq!(centre.edges, 1);
    assert_eq!(centre.incidents, 0);

    // bc crosses districts, so Plzeň 3 owns no edge.
    assert_eq!(stats[1].district, "Plzeň 3");
    assert_eq!(stats[1].edges, 0);
}

#[test]
fn saved_graph_loads_back_identically() {
    let graph = fixture_graph("disconnected.json");
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("nested").join("street_graph.json");

    saferoute_lib::save_graph(&path, &graph).expect("save graph");
    let loaded = saferoute_lib::load_graph(&path).expect("load graph");

    assert_eq!(loaded.nodes(), graph.nodes());
    assert_eq!(loaded.edges(), graph.edges());
    assert_eq!(loaded.incident_normalizer(), 3);
}

#[test]
fn missing_document_reports_path() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("absent.json");
    match saferoute_lib::load_graph(&path) {
        Err(Error::GraphSourceNotFound { path: reported }) => assert_eq!(reported, path),
        other => panic!("expected GraphSourceNotFound, got {other:?}"),
    }
}
