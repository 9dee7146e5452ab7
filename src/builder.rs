//! The tabular graph builder.
//!
//! Forward direction: two header-indexed tables (nodes, flows) in, a
//! validated [`FlowGraph`] out. Malformed edge rows are rejected as
//! data, never as errors. Reverse direction: the live graph projected
//! back to row sets with a fixed column order.

use crate::graph::{
    Edge, FlowGraph, InvalidEdge, Node, NodeProperties, Position, RejectReason,
    DEFAULT_NODE_COLOR,
};
use crate::table::Table;
use std::collections::HashSet;

/// Output column order for the nodes sheet.
pub const NODE_COLUMNS: [&str; 12] = [
    "key",
    "name",
    "description",
    "data_format",
    "data_quality",
    "latency",
    "consolidation_level",
    "pain_points",
    "improvement_potential",
    "x_position",
    "y_position",
    "color",
];

/// Output column order for the flows sheet.
pub const EDGE_COLUMNS: [&str; 12] = [
    "flow_key",
    "source_key",
    "destination_key",
    "description",
    "processing_type",
    "transformation_logic",
    "trigger_system",
    "volume (estimated)",
    "frequency",
    "process_owner",
    "pain_points",
    "improvement_potential",
];

/// A projected output cell. Positions are written as numbers, every
/// other attribute as text.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetCell {
    Text(String),
    Number(f64),
}

impl SheetCell {
    fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Build a validated graph from the node table and the flow table.
///
/// Node rows are scanned first: blank rows and rows with an empty
/// `key` are skipped silently, and duplicate keys are first-wins
/// (silent dedup, not a validation failure). Edge rows are then
/// accepted iff all three key fields are non-empty, both endpoints
/// resolve to built nodes, and the flow key was not already accepted;
/// everything else lands in `invalid_edges` with a single reason.
#[must_use]
pub fn build_graph(nodes: &Table, flows: &Table) -> FlowGraph {
    let mut graph = FlowGraph::default();
    let mut node_keys: HashSet<String> = HashSet::new();
    let mut edge_keys: HashSet<String> = HashSet::new();

    for row in 0..nodes.len() {
        if nodes.is_blank(row) {
            continue;
        }
        let key = nodes.trimmed(row, "key");
        if key.is_empty() || node_keys.contains(key) {
            continue;
        }

        let name = nodes.value(row, "name");
        let color = nodes.value(row, "color");
        graph.nodes.push(Node {
            key: key.to_string(),
            // name falls back to the key when the column is empty
            name: if name.is_empty() {
                key.to_string()
            } else {
                name.to_string()
            },
            description: nodes.value(row, "description").to_string(),
            node_type: nodes.value(row, "type").to_string(),
            color: if color.is_empty() {
                DEFAULT_NODE_COLOR.to_string()
            } else {
                color.to_string()
            },
            properties: NodeProperties {
                data_format: nodes.value(row, "data_format").to_string(),
                data_quality: nodes.value(row, "data_quality").to_string(),
                latency: nodes.value(row, "latency").to_string(),
                consolidation_level: nodes.value(row, "consolidation_level").to_string(),
                pain_points: nodes.value(row, "pain_points").to_string(),
                improvement_potential: nodes.value(row, "improvement_potential").to_string(),
            },
            position: Position {
                x: parse_coordinate(nodes.value(row, "x_position")),
                y: parse_coordinate(nodes.value(row, "y_position")),
            },
        });
        node_keys.insert(key.to_string());
    }

    for row in 0..flows.len() {
        if flows.is_blank(row) {
            continue;
        }
        let flow_key = flows.trimmed(row, "flow_key");
        let source_key = flows.trimmed(row, "source_key");
        let destination_key = flows.trimmed(row, "destination_key");

        // A row with no key fields at all is a genuinely blank row.
        if flow_key.is_empty() && source_key.is_empty() && destination_key.is_empty() {
            continue;
        }

        let accepted = !flow_key.is_empty()
            && !source_key.is_empty()
            && !destination_key.is_empty()
            && node_keys.contains(source_key)
            && node_keys.contains(destination_key)
            && !edge_keys.contains(flow_key);

        if accepted {
            graph.edges.push(Edge {
                flow_key: flow_key.to_string(),
                source_key: source_key.to_string(),
                destination_key: destination_key.to_string(),
                description: flows.value(row, "description").to_string(),
                processing_type: flows.value(row, "processing_type").to_string(),
                transformation_logic: flows.value(row, "transformation_logic").to_string(),
                trigger_system: flows.value(row, "trigger_system").to_string(),
                volume: flows.value(row, "volume (estimated)").to_string(),
                frequency: flows.value(row, "frequency").to_string(),
                process_owner: flows.value(row, "process_owner").to_string(),
                pain_points: flows.value(row, "pain_points").to_string(),
                improvement_potential: flows.value(row, "improvement_potential").to_string(),
            });
            edge_keys.insert(flow_key.to_string());
        } else {
            // First matching reason wins; the fallback is unreachable
            // but keeps the classification total.
            let reason = if flow_key.is_empty() {
                RejectReason::MissingFlowKey
            } else if source_key.is_empty() {
                RejectReason::MissingSourceKey
            } else if destination_key.is_empty() {
                RejectReason::MissingDestinationKey
            } else if !node_keys.contains(source_key) {
                RejectReason::UnknownSource(source_key.to_string())
            } else if !node_keys.contains(destination_key) {
                RejectReason::UnknownDestination(destination_key.to_string())
            } else if edge_keys.contains(flow_key) {
                RejectReason::DuplicateFlowKey
            } else {
                RejectReason::Unknown
            };
            graph
                .invalid_edges
                .push(InvalidEdge::new(flow_key, source_key, destination_key, reason));
        }
    }

    graph
}

/// Parse a position cell, defaulting to the origin coordinate when the
/// cell is empty or not a number.
fn parse_coordinate(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(0.0)
}

/// Project the live graph's nodes to header + data rows in
/// [`NODE_COLUMNS`] order. Pure projection, no validation.
#[must_use]
pub fn node_rows(graph: &FlowGraph) -> Vec<Vec<SheetCell>> {
    let mut rows = Vec::with_capacity(graph.nodes.len() + 1);
    rows.push(NODE_COLUMNS.iter().map(|c| SheetCell::text(c)).collect());
    for node in &graph.nodes {
        rows.push(vec![
            SheetCell::text(&node.key),
            SheetCell::text(&node.name),
            SheetCell::text(&node.description),
            SheetCell::text(&node.properties.data_format),
            SheetCell::text(&node.properties.data_quality),
            SheetCell::text(&node.properties.latency),
            SheetCell::text(&node.properties.consolidation_level),
            SheetCell::text(&node.properties.pain_points),
            SheetCell::text(&node.properties.improvement_potential),
            SheetCell::Number(node.position.x),
            SheetCell::Number(node.position.y),
            SheetCell::text(&node.color),
        ]);
    }
    rows
}

/// Project the live graph's edges to header + data rows in
/// [`EDGE_COLUMNS`] order.
#[must_use]
pub fn edge_rows(graph: &FlowGraph) -> Vec<Vec<SheetCell>> {
    let mut rows = Vec::with_capacity(graph.edges.len() + 1);
    rows.push(EDGE_COLUMNS.iter().map(|c| SheetCell::text(c)).collect());
    for edge in &graph.edges {
        rows.push(vec![
            SheetCell::text(&edge.flow_key),
            SheetCell::text(&edge.source_key),
            SheetCell::text(&edge.destination_key),
            SheetCell::text(&edge.description),
            SheetCell::text(&edge.processing_type),
            SheetCell::text(&edge.transformation_logic),
            SheetCell::text(&edge.trigger_system),
            SheetCell::text(&edge.volume),
            SheetCell::text(&edge.frequency),
            SheetCell::text(&edge.process_owner),
            SheetCell::text(&edge.pain_points),
            SheetCell::text(&edge.improvement_potential),
        ]);
    }
    rows
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

    fn table(rows: &[&[&str]]) -> Table {
        Table::from_rows(
            rows.iter()
                .map(|r| r.iter().map(ToString::to_string).collect())
                .collect(),
        )
    }

    #[test]
    fn builds_nodes_and_edges() {
        let nodes = table(&[&["key", "name"], &["N1", "Alpha"], &["N2", "Beta"]]);
        let flows = table(&[
            &["flow_key", "source_key", "destination_key"],
            &["F1", "N1", "N2"],
            &["F2", "N1", "N3"],
        ]);

        let graph = build_graph(&nodes, &flows);
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].flow_key, "F1");
        assert_eq!(graph.invalid_edges.len(), 1);
        assert_eq!(
            graph.invalid_edges[0].reason.to_string(),
            "Destination node \"N3\" not found"
        );
    }

    #[test]
    fn node_name_falls_back_to_key() {
        let nodes = table(&[&["key", "name"], &["N1", ""]]);
        let graph = build_graph(&nodes, &Table::default());
        assert_eq!(graph.nodes[0].name, "N1");
    }

    #[test]
    fn duplicate_node_keys_are_first_wins_and_silent() {
        let nodes = table(&[
            &["key", "name"],
            &["N1", "First"],
            &["N1", "Second"],
        ]);
        let graph = build_graph(&nodes, &Table::default());
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].name, "First");
    }

    #[test]
    fn unparsable_positions_default_to_origin() {
        let nodes = table(&[
            &["key", "x_position", "y_position"],
            &["N1", "12.5", "not a number"],
            &["N2", "", "-3"],
        ]);
        let graph = build_graph(&nodes, &Table::default());
        assert_eq!(graph.nodes[0].position, Position { x: 12.5, y: 0.0 });
        assert_eq!(graph.nodes[1].position, Position { x: 0.0, y: -3.0 });
    }

    #[test]
    fn missing_flow_key_beats_unknown_endpoint() {
        let nodes = table(&[&["key"], &["N1"]]);
        let flows = table(&[
            &["flow_key", "source_key", "destination_key"],
            &["", "NOPE", "N1"],
        ]);
        let graph = build_graph(&nodes, &flows);
        assert!(graph.edges.is_empty());
        assert_eq!(graph.invalid_edges[0].reason, RejectReason::MissingFlowKey);
        assert_eq!(graph.invalid_edges[0].flow_key, "No flow key");
    }

    #[test]
    fn duplicate_flow_key_is_reported() {
        let nodes = table(&[&["key"], &["N1"], &["N2"]]);
        let flows = table(&[
            &["flow_key", "source_key", "destination_key"],
            &["F1", "N1", "N2"],
            &["F1", "N2", "N1"],
        ]);
        let graph = build_graph(&nodes, &flows);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.invalid_edges[0].reason, RejectReason::DuplicateFlowKey);
    }

    #[test]
    fn projection_column_order_is_fixed() {
        let nodes = table(&[&["key"], &["N1"]]);
        let graph = build_graph(&nodes, &Table::default());
        let rows = node_rows(&graph);
        assert_eq!(rows[0].len(), NODE_COLUMNS.len());
        assert_eq!(rows[0][0], SheetCell::Text("key".into()));
        assert_eq!(rows[0][11], SheetCell::Text("color".into()));
        assert_eq!(rows[1][9], SheetCell::Number(0.0));
    }
}
