// Test utilities used across `saferoute-cli` unit tests.
// Kept under `#[cfg(test)]` so it is not part of the public crate API.
use saferoute_lib::{parse_graph, plan_route, Coordinate, RouteRequest, RouteSummary};

const LINE_GRAPH: &str = r#"{
  "nodes": [
    { "id": "A", "lat": 49.7477, "lng": 13.3775, "district": "Plzeň 1", "lighting_score": 90, "crime_risk_score": 5 },
    { "id": "B", "lat": 49.7477, "lng": 13.3787, "district": "Plzeň 1", "lighting_score": 70, "crime_risk_score": 20 },
    { "id": "C", "lat": 49.7477, "lng": 13.3799, "district": "Plzeň 3", "lighting_score": 30, "crime_risk_score": 60 }
  ],
  "edges": [
    { "id": "ab", "from": "A", "to": "B", "length_m": 100.0, "avg_lighting": 80, "incident_count": 0, "street": "Americká" },
    { "id": "bc", "from": "B", "to": "C", "length_m": 100.0, "avg_lighting": 30, "incident_count": 10, "street": "Klatovská" }
  ]
}"#;

/// Summary of the A -> C walk over a three node line with one dark street.
pub fn sample_summary() -> RouteSummary {
    let graph = parse_graph(LINE_GRAPH).expect("line graph parses");
    let request = RouteRequest::new(
        Coordinate::new(49.7477, 13.3775),
        Coordinate::new(49.7477, 13.3799),
    );
    let plan = plan_route(&graph, &request).expect("line graph has a route");
    RouteSummary::from_plan(&plan)
}
