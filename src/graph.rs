//! The in-memory data-flow graph model.
//!
//! Everything here is plain serde data: the wasm layer hands a
//! [`FlowGraph`] to the JavaScript rendering widget as one value, and
//! the widget's position/color edits flow back through
//! [`crate::app::FlowApp`].

use serde::{Serialize, Serializer};
use std::fmt;

/// Fill color applied to nodes whose `color` column is absent or empty.
pub const DEFAULT_NODE_COLOR: &str = "#ffffff";

/// A 2D diagram position. Defaults to the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Display properties carried by a node (free-form text, empty when absent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeProperties {
    pub data_format: String,
    pub data_quality: String,
    pub latency: String,
    pub consolidation_level: String,
    pub pain_points: String,
    pub improvement_potential: String,
}

/// A data source/target entity, keyed uniquely within the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub key: String,
    pub name: String,
    pub description: String,
    pub node_type: String,
    pub color: String,
    pub properties: NodeProperties,
    pub position: Position,
}

/// A directed data-flow relationship between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub flow_key: String,
    pub source_key: String,
    pub destination_key: String,
    pub description: String,
    pub processing_type: String,
    pub transformation_logic: String,
    pub trigger_system: String,
    pub volume: String,
    pub frequency: String,
    pub process_owner: String,
    pub pain_points: String,
    pub improvement_potential: String,
}

/// Why an edge row was rejected. Exactly one reason per row, chosen by
/// fixed precedence (see [`crate::builder::build_graph`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    MissingFlowKey,
    MissingSourceKey,
    MissingDestinationKey,
    UnknownSource(String),
    UnknownDestination(String),
    DuplicateFlowKey,
    Unknown,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFlowKey => write!(f, "Missing flow key"),
            Self::MissingSourceKey => write!(f, "Missing source key"),
            Self::MissingDestinationKey => write!(f, "Missing destination key"),
            Self::UnknownSource(key) => write!(f, "Source node \"{key}\" not found"),
            Self::UnknownDestination(key) => write!(f, "Destination node \"{key}\" not found"),
            Self::DuplicateFlowKey => write!(f, "Duplicate flow key"),
            Self::Unknown => write!(f, "Unknown error"),
        }
    }
}

// The widget and the error panel only ever see the human-readable
// message, so the reason serializes as its display string.
impl Serialize for RejectReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A rejected edge row: raw key fields plus the rejection reason.
///
/// Empty key fields keep the placeholder texts the error panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidEdge {
    pub flow_key: String,
    pub source_key: String,
    pub destination_key: String,
    pub reason: RejectReason,
}

impl InvalidEdge {
    /// Build a record from raw (trimmed) key fields, substituting the
    /// placeholder texts for empty ones.
    #[must_use]
    pub fn new(flow_key: &str, source_key: &str, destination_key: &str, reason: RejectReason) -> Self {
        let or_placeholder = |value: &str, placeholder: &str| {
            if value.is_empty() {
                placeholder.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            flow_key: or_placeholder(flow_key, "No flow key"),
            source_key: or_placeholder(source_key, "No source"),
            destination_key: or_placeholder(destination_key, "No destination"),
            reason,
        }
    }
}

/// A validated graph: accepted nodes and edges, plus the rejects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub invalid_edges: Vec<InvalidEdge>,
}

impl FlowGraph {
    /// Find a node by key.
    #[must_use]
    pub fn node(&self, key: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.key == key)
    }

    /// Find a node by key, mutably.
    pub fn node_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.key == key)
    }

    /// Find an edge by flow key.
    #[must_use]
    pub fn edge(&self, flow_key: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.flow_key == flow_key)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn reject_reason_messages() {
        assert_eq!(RejectReason::MissingFlowKey.to_string(), "Missing flow key");
        assert_eq!(
            RejectReason::UnknownDestination("N3".into()).to_string(),
            "Destination node \"N3\" not found"
        );
        assert_eq!(
            RejectReason::DuplicateFlowKey.to_string(),
            "Duplicate flow key"
        );
    }

    #[test]
    fn invalid_edge_placeholders() {
        let rec = InvalidEdge::new("", "", "", RejectReason::MissingFlowKey);
        assert_eq!(rec.flow_key, "No flow key");
        assert_eq!(rec.source_key, "No source");
        assert_eq!(rec.destination_key, "No destination");

        let rec = InvalidEdge::new("F1", "A", "B", RejectReason::DuplicateFlowKey);
        assert_eq!(rec.flow_key, "F1");
        assert_eq!(rec.source_key, "A");
    }
}
