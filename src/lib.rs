//! flowsheet - data-flow diagrams from Excel workbooks
//!
//! Parses a workbook's "Sources and Targets" and "Data Flows and
//! Processes" sheets into a validated node-link graph, lets the UI
//! move and recolor nodes, and serializes the result back to a fresh
//! two-sheet XLSX:
//! - Header-indexed parsing, so column order in the input is free
//! - Malformed edge rows are collected with human-readable reasons
//! - Export uses a fixed column layout and inline strings
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { FlowSheet } from 'flowsheet';
//! await init();
//! const sheet = new FlowSheet();
//! const summary = sheet.load(bytes, file.name);
//! const graph = sheet.graph();
//! sheet.set_node_position('N1', 120, 80);
//! const out = sheet.save();
//! ```

pub mod app;
pub mod builder;
pub mod cell_ref;
pub mod error;
pub mod export;
pub mod graph;
pub mod parser;
pub mod table;

use wasm_bindgen::prelude::*;

pub use app::{FlowApp, FlowSheet, LoadSummary, Selection};
pub use graph::FlowGraph;

/// Hook up panics and the `log` facade to the browser console.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Parse an XLSX file straight to a validated graph, as a JSON string.
///
/// # Errors
/// Returns an error if the file is not a readable XLSX or either
/// required sheet is missing.
#[wasm_bindgen]
pub fn parse_workbook(data: &[u8]) -> Result<String, JsValue> {
    let graph = parse_to_graph(data).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&graph)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Parse an XLSX file straight to a validated graph, as a `JsValue`.
///
/// More efficient than [`parse_workbook`] when the result is consumed
/// directly in JavaScript.
///
/// # Errors
/// Returns an error if the file is not a readable XLSX or either
/// required sheet is missing.
#[wasm_bindgen]
pub fn parse_workbook_to_js(data: &[u8]) -> Result<JsValue, JsValue> {
    let graph = parse_to_graph(data).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&graph)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

fn parse_to_graph(data: &[u8]) -> error::Result<FlowGraph> {
    let workbook = parser::parse(data)?;
    let nodes = workbook
        .sheet(app::NODES_SHEET)
        .ok_or_else(|| error::FlowsheetError::SheetMissing(app::NODES_SHEET.to_string()))?;
    let flows = workbook
        .sheet(app::FLOWS_SHEET)
        .ok_or_else(|| error::FlowsheetError::SheetMissing(app::FLOWS_SHEET.to_string()))?;
    Ok(builder::build_graph(
        &table::Table::from_rows(nodes.rows.clone()),
        &table::Table::from_rows(flows.rows.clone()),
    ))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
