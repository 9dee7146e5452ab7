//! CLI tool for flowsheet - builds the graph from an XLSX and outputs JSON
//!
//! Usage:
//!   flowsheet_cli <input.xlsx>                  # Graph JSON to stdout
//!   flowsheet_cli <input.xlsx> -o out.json      # Graph JSON to file
//!   flowsheet_cli <input.xlsx> --save out.xlsx  # Re-export the graph as XLSX

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use flowsheet::FlowApp;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: flowsheet_cli <input.xlsx> [-o output.json | --save output.xlsx]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let mut json_path: Option<&String> = None;
    let mut xlsx_path: Option<&String> = None;
    if args.len() > 3 {
        match args[2].as_str() {
            "-o" => json_path = Some(&args[3]),
            "--save" => xlsx_path = Some(&args[3]),
            other => {
                eprintln!("Unknown option: {}", other);
                std::process::exit(1);
            }
        }
    }

    let data = match fs::read(input_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    let mut app = FlowApp::new();
    let summary = match app.load(&data, input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading workbook: {}", e);
            std::process::exit(1);
        }
    };

    eprintln!(
        "{} nodes, {} edges, {} invalid edge rows",
        summary.node_count,
        summary.edge_count,
        summary.invalid_edges.len()
    );
    for invalid in &summary.invalid_edges {
        eprintln!("  {}: {}", invalid.flow_key, invalid.reason);
    }

    if let Some(path) = xlsx_path {
        let bytes = match app.export() {
            Ok(b) => b,
            Err(e) => {
                eprintln!("Error exporting XLSX: {}", e);
                std::process::exit(1);
            }
        };
        if let Err(e) = fs::write(path, bytes) {
            eprintln!("Error writing {}: {}", path, e);
            std::process::exit(1);
        }
        eprintln!("Written: {}", path);
        return;
    }

    let graph = app.graph().expect("graph present after successful load");
    let json = match serde_json::to_string_pretty(graph) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    match json_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
