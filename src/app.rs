//! Application state wrapper around the graph pipeline.
//!
//! `FlowApp` owns the lifecycle the UI drives:
//! - Load an XLSX file and build the validated graph
//! - Mutate node positions/colors as the user drags and recolors
//! - Track the current selection (node or edge, never both)
//! - Export the live graph back to a fresh XLSX

use wasm_bindgen::prelude::*;

use serde::Serialize;

use crate::builder;
use crate::error::FlowsheetError;
use crate::export;
use crate::graph::{FlowGraph, InvalidEdge};
use crate::parser;
use crate::table::Table;

/// Required worksheet holding the node rows.
pub const NODES_SHEET: &str = "Sources and Targets";

/// Required worksheet holding the flow rows.
pub const FLOWS_SHEET: &str = "Data Flows and Processes";

/// Export file name used when no input file name is known.
pub const DEFAULT_EXPORT_NAME: &str = "layout.xlsx";

/// What the user currently has selected in the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Node(String),
    Edge(String),
}

/// Counts and rejects reported after a successful load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub invalid_edges: Vec<InvalidEdge>,
}

/// Application state: the loaded graph plus UI bookkeeping.
#[derive(Debug, Default)]
pub struct FlowApp {
    graph: Option<FlowGraph>,
    selection: Selection,
    loaded_file_name: Option<String>,
}

impl FlowApp {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an XLSX file and replace all state with the freshly built
    /// graph.
    ///
    /// Both required sheets must be present by exact name; a missing
    /// sheet fails the load and leaves the previous state untouched.
    pub fn load(&mut self, data: &[u8], file_name: &str) -> crate::error::Result<LoadSummary> {
        let workbook = parser::parse(data)?;

        let nodes = workbook
            .sheet(NODES_SHEET)
            .ok_or_else(|| FlowsheetError::SheetMissing(NODES_SHEET.to_string()))?;
        let flows = workbook
            .sheet(FLOWS_SHEET)
            .ok_or_else(|| FlowsheetError::SheetMissing(FLOWS_SHEET.to_string()))?;

        let graph = builder::build_graph(
            &Table::from_rows(nodes.rows.clone()),
            &Table::from_rows(flows.rows.clone()),
        );

        let summary = LoadSummary {
            node_count: graph.nodes.len(),
            edge_count: graph.edges.len(),
            invalid_edges: graph.invalid_edges.clone(),
        };
        log::info!(
            "loaded {}: {} nodes, {} edges, {} invalid edge rows",
            file_name,
            summary.node_count,
            summary.edge_count,
            summary.invalid_edges.len()
        );
        for invalid in &summary.invalid_edges {
            log::warn!("rejected edge row {}: {}", invalid.flow_key, invalid.reason);
        }

        self.graph = Some(graph);
        self.selection = Selection::None;
        self.loaded_file_name = if file_name.is_empty() {
            None
        } else {
            Some(file_name.to_string())
        };

        Ok(summary)
    }

    /// The current graph, if a file has been loaded.
    #[must_use]
    pub fn graph(&self) -> Option<&FlowGraph> {
        self.graph.as_ref()
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Move a node. Unknown keys are ignored; returns whether the move
    /// was applied.
    pub fn set_node_position(&mut self, key: &str, x: f64, y: f64) -> bool {
        let Some(node) = self.graph.as_mut().and_then(|g| g.node_mut(key)) else {
            return false;
        };
        node.position.x = x;
        node.position.y = y;
        true
    }

    /// Recolor a node. Unknown keys are ignored; returns whether the
    /// color was applied.
    pub fn set_node_color(&mut self, key: &str, color: &str) -> bool {
        let Some(node) = self.graph.as_mut().and_then(|g| g.node_mut(key)) else {
            return false;
        };
        node.color = color.to_string();
        true
    }

    /// Select a node, clearing any edge selection. Unknown keys clear
    /// the selection instead.
    pub fn select_node(&mut self, key: &str) -> bool {
        if self.graph.as_ref().and_then(|g| g.node(key)).is_some() {
            self.selection = Selection::Node(key.to_string());
            true
        } else {
            self.selection = Selection::None;
            false
        }
    }

    /// Select an edge by flow key, clearing any node selection.
    /// Unknown keys clear the selection instead.
    pub fn select_edge(&mut self, flow_key: &str) -> bool {
        if self.graph.as_ref().and_then(|g| g.edge(flow_key)).is_some() {
            self.selection = Selection::Edge(flow_key.to_string());
            true
        } else {
            self.selection = Selection::None;
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    /// Export the live graph (current positions and colors included)
    /// to a fresh two-sheet XLSX.
    pub fn export(&self) -> crate::error::Result<Vec<u8>> {
        let graph = self
            .graph
            .as_ref()
            .ok_or_else(|| FlowsheetError::Other("no file loaded".to_string()))?;
        export::save_workbook(&[
            (NODES_SHEET, builder::node_rows(graph)),
            (FLOWS_SHEET, builder::edge_rows(graph)),
        ])
    }

    /// File name to offer for the export download. Reuses the loaded
    /// file's name so a round trip overwrites in place.
    #[must_use]
    pub fn export_file_name(&self) -> String {
        self.loaded_file_name
            .clone()
            .unwrap_or_else(|| DEFAULT_EXPORT_NAME.to_string())
    }
}

/// The graph editor exported to JavaScript.
///
/// Thin wrapper over [`FlowApp`]: the rendering widget receives the
/// whole graph as one JS value and pushes position/color edits back
/// through the setters.
#[wasm_bindgen]
pub struct FlowSheet {
    app: FlowApp,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl FlowSheet {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> FlowSheet {
        FlowSheet {
            app: FlowApp::new(),
        }
    }

    /// Load an XLSX file from bytes. Returns a load summary object
    /// (`node_count`, `edge_count`, `invalid_edges`).
    #[wasm_bindgen]
    pub fn load(&mut self, data: &[u8], file_name: &str) -> Result<JsValue, JsValue> {
        let summary = self.app.load(data, file_name)?;
        serde_wasm_bindgen::to_value(&summary).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The full graph as a JS value, or `undefined` before a load.
    #[wasm_bindgen]
    pub fn graph(&self) -> Result<JsValue, JsValue> {
        match self.app.graph() {
            Some(graph) => {
                serde_wasm_bindgen::to_value(graph).map_err(|e| JsValue::from_str(&e.to_string()))
            }
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen]
    pub fn set_node_position(&mut self, key: &str, x: f64, y: f64) -> bool {
        self.app.set_node_position(key, x, y)
    }

    #[wasm_bindgen]
    pub fn set_node_color(&mut self, key: &str, color: &str) -> bool {
        self.app.set_node_color(key, color)
    }

    #[wasm_bindgen]
    pub fn select_node(&mut self, key: &str) -> bool {
        self.app.select_node(key)
    }

    #[wasm_bindgen]
    pub fn select_edge(&mut self, flow_key: &str) -> bool {
        self.app.select_edge(flow_key)
    }

    #[wasm_bindgen]
    pub fn clear_selection(&mut self) {
        self.app.clear_selection();
    }

    /// Key of the selected node, or `None`.
    #[wasm_bindgen]
    pub fn selected_node(&self) -> Option<String> {
        match self.app.selection() {
            Selection::Node(key) => Some(key.clone()),
            _ => None,
        }
    }

    /// Flow key of the selected edge, or `None`.
    #[wasm_bindgen]
    pub fn selected_edge(&self) -> Option<String> {
        match self.app.selection() {
            Selection::Edge(key) => Some(key.clone()),
            _ => None,
        }
    }

    /// Serialize the live graph to XLSX bytes for download.
    #[wasm_bindgen]
    pub fn save(&self) -> Result<Vec<u8>, JsValue> {
        Ok(self.app.export()?)
    }

    /// File name to use for the download.
    #[wasm_bindgen]
    pub fn save_file_name(&self) -> String {
        self.app.export_file_name()
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for FlowSheet {
    fn default() -> Self {
        Self::new()
    }
}

// Non-wasm32 implementation (for tests/CLI).
#[cfg(not(target_arch = "wasm32"))]
impl FlowSheet {
    #[must_use]
    pub fn new_test() -> Self {
        FlowSheet {
            app: FlowApp::new(),
        }
    }

    pub fn load(&mut self, data: &[u8], file_name: &str) -> crate::error::Result<LoadSummary> {
        self.app.load(data, file_name)
    }

    #[must_use]
    pub fn app(&self) -> &FlowApp {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut FlowApp {
        &mut self.app
    }

    pub fn save(&self) -> crate::error::Result<Vec<u8>> {
        self.app.export()
    }

    #[must_use]
    pub fn save_file_name(&self) -> String {
        self.app.export_file_name()
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
    fn selection_is_exclusive() {
        let mut app = FlowApp::new();
        let nodes = Table::from_rows(vec![
            vec!["key".to_string()],
            vec!["N1".to_string()],
            vec!["N2".to_string()],
        ]);
        let flows = Table::from_rows(vec![
            vec![
                "flow_key".to_string(),
                "source_key".to_string(),
                "destination_key".to_string(),
            ],
            vec!["F1".to_string(), "N1".to_string(), "N2".to_string()],
        ]);
        app.graph = Some(builder::build_graph(&nodes, &flows));

        assert!(app.select_node("N1"));
        assert_eq!(*app.selection(), Selection::Node("N1".to_string()));
        assert!(app.select_edge("F1"));
        assert_eq!(*app.selection(), Selection::Edge("F1".to_string()));
        assert!(!app.select_node("missing"));
        assert_eq!(*app.selection(), Selection::None);
    }

    #[test]
    fn mutations_ignore_unknown_keys() {
        let mut app = FlowApp::new();
        let nodes = Table::from_rows(vec![vec!["key".to_string()], vec!["N1".to_string()]]);
        app.graph = Some(builder::build_graph(&nodes, &Table::default()));

        assert!(app.set_node_position("N1", 10.0, -4.5));
        assert!(!app.set_node_position("missing", 1.0, 1.0));
        assert!(app.set_node_color("N1", "#ff0000"));
        assert!(!app.set_node_color("missing", "#ff0000"));

        let node = app.graph().unwrap().node("N1").unwrap();
        assert_eq!(node.position.x, 10.0);
        assert_eq!(node.position.y, -4.5);
        assert_eq!(node.color, "#ff0000");
    }

    #[test]
    fn export_without_load_fails() {
        let app = FlowApp::new();
        assert!(app.export().is_err());
    }

    #[test]
    fn export_file_name_falls_back() {
        let app = FlowApp::new();
        assert_eq!(app.export_file_name(), DEFAULT_EXPORT_NAME);
    }
}
