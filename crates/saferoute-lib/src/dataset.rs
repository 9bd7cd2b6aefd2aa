//! Street graph documents on disk.
//!
//! A graph document is a JSON object with `nodes` and `edges` arrays. Edge
//! `avg_lighting` may be omitted and is then derived from the endpoint
//! lighting scores. The camelCase field names used by browser-side street
//! data (`lightingScore`, `crimeRisk`, `distance`, `avgLighting`,
//! `crimeIncidents`, `streetName`) are accepted as aliases.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{build_graph, Edge, EdgeId, Graph, Node, NodeId};

/// Default filename for the street graph document.
pub const GRAPH_FILENAME: &str = "street_graph.json";

/// Environment variable overriding the graph document location.
pub const GRAPH_ENV_VAR: &str = "SAFEROUTE_GRAPH";

/// Edge as stored in a graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(alias = "distance")]
    pub length_m: f64,
    #[serde(
        default,
        alias = "avgLighting",
        skip_serializing_if = "Option::is_none"
    )]
    pub avg_lighting: Option<u8>,
    #[serde(default, alias = "crimeIncidents")]
    pub incident_count: u32,
    #[serde(default, alias = "streetName")]
    pub street: String,
}

impl From<&Edge> for EdgeRecord {
    fn from(edge: &Edge) -> Self {
        Self {
            id: edge.id.clone(),
            from: edge.from.clone(),
            to: edge.to.clone(),
            length_m: edge.length_m,
            avg_lighting: Some(edge.avg_lighting),
            incident_count: edge.incident_count,
            street: edge.street.clone(),
        }
    }
}

/// Serializable form of a [`Graph`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphDocument {
    pub fn from_graph(graph: &Graph) -> Self {
        Self {
            nodes: graph.nodes().to_vec(),
            edges: graph.edges().iter().map(EdgeRecord::from).collect(),
        }
    }

    /// Fill in derived edge lighting and validate the result.
    pub fn into_graph(self) -> Result<Graph> {
        let lighting: HashMap<&str, u8> = self
            .nodes
            .iter()
            .map(|node| (node.id.as_str(), node.lighting_score))
            .collect();

        let edges = self
            .edges
            .iter()
            .map(|record| Edge {
                id: record.id.clone(),
                from: record.from.clone(),
                to: record.to.clone(),
                length_m: record.length_m,
                avg_lighting: record.avg_lighting.unwrap_or_else(|| {
                    let from = lighting.get(record.from.as_str()).copied().unwrap_or(0);
                    let to = lighting.get(record.to.as_str()).copied().unwrap_or(0);
                    mean_lighting(from, to)
                }),
                incident_count: record.incident_count,
                street: record.street.clone(),
            })
            .collect();

        build_graph(self.nodes, edges)
    }
}

/// Rounded mean of two lighting scores, halves rounding up.
pub fn mean_lighting(a: u8, b: u8) -> u8 {
    ((u16::from(a) + u16::from(b) + 1) / 2) as u8
}

/// Parse and validate a graph document from a JSON string.
pub fn parse_graph(json: &str) -> Result<Graph> {
    let document: GraphDocument = serde_json::from_str(json)?;
    document.into_graph()
}

/// Load and validate a graph document from disk.
pub fn load_graph(path: &Path) -> Result<Graph> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(Error::GraphSourceNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(err) => return Err(err.into()),
    };
    let graph = parse_graph(&raw)?;
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded street graph"
    );
    Ok(graph)
}

/// Write `graph` as a pretty-printed JSON document, creating parent
/// directories as needed.
pub fn save_graph(path: &Path, graph: &Graph) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(&GraphDocument::from_graph(graph))?;
    fs::write(path, json)?;
    info!(path = %path.display(), nodes = graph.node_count(), "saved street graph");
    Ok(())
}

/// Resolve the default graph location using platform-specific project directories.
pub fn default_graph_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("com", "saferoute", "saferoute").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(GRAPH_FILENAME))
}

/// Locate the graph document.
///
/// The resolution order is:
/// 1. Explicit `target` argument when provided.
/// 2. `SAFEROUTE_GRAPH` environment variable.
/// 3. Platform-specific project data directory.
///
/// Directories resolve to the `street_graph.json` inside them. The resolved
/// file must exist.
pub fn resolve_graph_path(target: Option<&Path>) -> Result<PathBuf> {
    let (source, path) = if let Some(explicit) = target {
        ("argument", canonical_graph_path(explicit))
    } else if let Some(env_path) = env::var_os(GRAPH_ENV_VAR) {
        ("environment", canonical_graph_path(Path::new(&env_path)))
    } else {
        ("project directory", default_graph_path()?)
    };

    debug!(source, path = %path.display(), "resolved graph document path");

    if !path.is_file() {
        return Err(Error::GraphSourceNotFound { path });
    }
    Ok(path)
}

fn canonical_graph_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.join(GRAPH_FILENAME);
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_missing_edge_lighting() {
        let graph = parse_graph(
            r#"{
                "nodes": [
                    {"id": "a", "lat": 49.0, "lng": 13.0, "district": "Plzeň 1",
                     "lighting_score": 81, "crime_risk_score": 0},
                    {"id": "b", "lat": 49.001, "lng": 13.0, "district": "Plzeň 1",
                     "lighting_score": 40, "crime_risk_score": 12}
                ],
                "edges": [
                    {"id": "e1", "from": "a", "to": "b", "length_m": 111.0}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(graph.edges()[0].avg_lighting, 61);
        assert_eq!(graph.edges()[0].incident_count, 0);
    }

    #[test]
    fn accepts_generator_field_names() {
        let graph = parse_graph(
            r#"{
                "nodes": [
                    {"id": "n001", "lat": 49.7, "lng": 13.32, "district": "Plzeň 3",
                     "lightingScore": 55, "crimeRisk": 30, "gridX": 0, "gridY": 0},
                    {"id": "n002", "lat": 49.7, "lng": 13.3273, "district": "Plzeň 3",
                     "lightingScore": 57, "crimeRisk": 28, "gridX": 1, "gridY": 0}
                ],
                "edges": [
                    {"id": "e1", "from": "n001", "to": "n002", "distance": 526,
                     "avgLighting": 56, "crimeIncidents": 3, "streetName": "Americká"}
                ]
            }"#,
        )
        .unwrap();
        let edge = &graph.edges()[0];
        assert_eq!(edge.length_m, 526.0);
        assert_eq!(edge.street, "Americká");
        assert_eq!(graph.node("n001").unwrap().crime_risk_score, 30);
    }

    #[test]
    fn explicit_missing_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let error = resolve_graph_path(Some(&missing)).unwrap_err();
        assert!(matches!(error, Error::GraphSourceNotFound { ref path } if *path == missing));
    }

    #[test]
    fn directories_resolve_to_default_filename() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(GRAPH_FILENAME);
        fs::write(&file, "{}").unwrap();
        assert_eq!(resolve_graph_path(Some(dir.path())).unwrap(), file);
    }

    #[test]
    fn mean_lighting_rounds_half_up() {
        assert_eq!(mean_lighting(40, 81), 61);
        assert_eq!(mean_lighting(100, 100), 100);
        assert_eq!(mean_lighting(0, 1), 1);
    }
}
