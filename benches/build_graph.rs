//! Benchmarks for graph building and projection.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flowsheet::builder::{build_graph, edge_rows, node_rows};
use flowsheet::export::save_workbook;
use flowsheet::table::Table;

/// Synthetic node table: `count` rows with positions and colors.
fn synthetic_nodes(count: usize) -> Table {
    let mut grid = vec![vec![
        "key".to_string(),
        "name".to_string(),
        "description".to_string(),
        "x_position".to_string(),
        "y_position".to_string(),
        "color".to_string(),
    ]];
    for i in 0..count {
        grid.push(vec![
            format!("N{i}"),
            format!("Node {i}"),
            "synthetic".to_string(),
            format!("{}", i * 10),
            format!("{}", i * 7),
            "#4472c4".to_string(),
        ]);
    }
    Table::from_rows(grid)
}

/// Synthetic flow table: one edge per node to its successor, plus a
/// slice of rows with unknown endpoints.
fn synthetic_flows(count: usize) -> Table {
    let mut grid = vec![vec![
        "flow_key".to_string(),
        "source_key".to_string(),
        "destination_key".to_string(),
        "frequency".to_string(),
    ]];
    for i in 0..count {
        grid.push(vec![
            format!("F{i}"),
            format!("N{i}"),
            format!("N{}", (i + 1) % count),
            "daily".to_string(),
        ]);
    }
    for i in 0..count / 10 {
        grid.push(vec![
            format!("X{i}"),
            format!("MISSING{i}"),
            format!("N{i}"),
            String::new(),
        ]);
    }
    Table::from_rows(grid)
}

fn bench_build_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");

    for count in [100_usize, 1_000, 5_000] {
        let nodes = synthetic_nodes(count);
        let flows = synthetic_flows(count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("nodes", count),
            &(&nodes, &flows),
            |b, (nodes, flows)| b.iter(|| build_graph(black_box(nodes), black_box(flows))),
        );
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let nodes = synthetic_nodes(1_000);
    let flows = synthetic_flows(1_000);
    let graph = build_graph(&nodes, &flows);

    c.bench_function("export_1000", |b| {
        b.iter(|| {
            save_workbook(&[
                ("Sources and Targets", node_rows(black_box(&graph))),
                ("Data Flows and Processes", edge_rows(black_box(&graph))),
            ])
            .expect("Failed to export")
        })
    });
}

criterion_group!(benches, bench_build_graph, bench_export);
criterion_main!(benches);
