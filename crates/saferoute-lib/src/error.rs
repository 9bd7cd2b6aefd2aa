use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::graph::{EdgeId, NodeId};

/// Convenient result alias for the SafeRoute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when the supplied nodes/edges do not form a valid graph.
    #[error("invalid graph: {defect}")]
    InvalidGraph { defect: GraphDefect },

    /// Raised when a nearest-node query runs against a graph without nodes.
    #[error("graph contains no nodes")]
    EmptyGraph,

    /// Raised when a node identifier is not present in the graph.
    #[error("unknown node id: {id}")]
    InvalidNode { id: NodeId },

    /// Raised when a query coordinate is not a finite WGS84 position.
    #[error("invalid coordinate ({lat}, {lng})")]
    InvalidCoordinate { lat: f64, lng: f64 },

    /// Raised when no path connects the two nodes.
    #[error("no route found between {start} and {goal}")]
    RouteNotFound { start: NodeId, goal: NodeId },

    /// Raised when the caller cancelled a search in flight.
    #[error("route search cancelled after settling {settled} nodes")]
    SearchCancelled { settled: usize },

    /// Graph document could not be located at the resolved path.
    #[error("graph document not found at {path}")]
    GraphSourceNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the graph document")]
    ProjectDirsUnavailable,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for graph document (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the caller can recover by choosing different endpoints or options.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::EmptyGraph
                | Error::InvalidNode { .. }
                | Error::InvalidCoordinate { .. }
                | Error::RouteNotFound { .. }
                | Error::SearchCancelled { .. }
        )
    }
}

/// Specific reason a graph failed validation at construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphDefect {
    DuplicateNode {
        id: NodeId,
    },
    DuplicateEdge {
        id: EdgeId,
    },
    UnknownEndpoint {
        edge: EdgeId,
        node: NodeId,
    },
    NonPositiveLength {
        edge: EdgeId,
        length_m: f64,
    },
    ScoreOutOfRange {
        owner: String,
        field: &'static str,
        value: u8,
    },
    InvalidNodePosition {
        id: NodeId,
        lat: f64,
        lng: f64,
    },
}

impl fmt::Display for GraphDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphDefect::DuplicateNode { id } => write!(f, "duplicate node id {id}"),
            GraphDefect::DuplicateEdge { id } => write!(f, "duplicate edge id {id}"),
            GraphDefect::UnknownEndpoint { edge, node } => {
                write!(f, "edge {edge} references unknown node {node}")
            }
            GraphDefect::NonPositiveLength { edge, length_m } => {
                write!(f, "edge {edge} has non-positive length {length_m} m")
            }
            GraphDefect::ScoreOutOfRange {
                owner,
                field,
                value,
            } => write!(f, "{owner} has {field} {value}, expected 0-100"),
            GraphDefect::InvalidNodePosition { id, lat, lng } => {
                write!(f, "node {id} has invalid position ({lat}, {lng})")
            }
        }
    }
}

impl From<GraphDefect> for Error {
    fn from(defect: GraphDefect) -> Self {
        Error::InvalidGraph { defect }
    }
}
