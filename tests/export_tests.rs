//! Tests for the XLSX export pipeline.

mod fixtures;

#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use std::io::{Cursor, Read};

    use crate::fixtures::flowsheet_xlsx;
    use flowsheet::builder::{build_graph, edge_rows, node_rows, EDGE_COLUMNS, NODE_COLUMNS};
    use flowsheet::export::save_workbook;
    use flowsheet::graph::FlowGraph;
    use flowsheet::parser;
    use flowsheet::table::Table;

    fn sample_graph() -> FlowGraph {
        let data = flowsheet_xlsx(
            &[
                &["key", "name", "description", "x_position", "color"],
                &["a", "Alpha & Co", "first <node>", "12.5", "#112233"],
                &["b", "Beta", "", "", ""],
            ],
            &[
                &["flow_key", "source_key", "destination_key", "volume (estimated)"],
                &["F1", "a", "b", "500/day"],
            ],
        );
        let workbook = parser::parse(&data).unwrap();
        build_graph(
            &Table::from_rows(workbook.sheet("Sources and Targets").unwrap().rows.clone()),
            &Table::from_rows(
                workbook
                    .sheet("Data Flows and Processes")
                    .unwrap()
                    .rows
                    .clone(),
            ),
        )
    }

    #[test]
    fn package_contains_expected_parts() {
        let graph = sample_graph();
        let bytes = save_workbook(&[
            ("Sources and Targets", node_rows(&graph)),
            ("Data Flows and Processes", edge_rows(&graph)),
        ])
        .unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(&bytes)).unwrap();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "xl/_rels/workbook.xml.rels",
            "xl/workbook.xml",
            "xl/styles.xml",
            "xl/worksheets/sheet1.xml",
            "xl/worksheets/sheet2.xml",
        ] {
            assert!(archive.by_name(part).is_ok(), "missing part: {part}");
        }

        let mut workbook_xml = String::new();
        archive
            .by_name("xl/workbook.xml")
            .unwrap()
            .read_to_string(&mut workbook_xml)
            .unwrap();
        assert!(workbook_xml.contains(r#"name="Sources and Targets""#));
        assert!(workbook_xml.contains(r#"name="Data Flows and Processes""#));
    }

    #[test]
    fn header_rows_use_the_fixed_column_order() {
        let graph = sample_graph();
        let bytes = save_workbook(&[
            ("Sources and Targets", node_rows(&graph)),
            ("Data Flows and Processes", edge_rows(&graph)),
        ])
        .unwrap();

        let workbook = parser::parse(&bytes).unwrap();
        let nodes = workbook.sheet("Sources and Targets").unwrap();
        assert_eq!(nodes.rows[0], NODE_COLUMNS.to_vec());

        let flows = workbook.sheet("Data Flows and Processes").unwrap();
        assert_eq!(flows.rows[0], EDGE_COLUMNS.to_vec());
    }

    #[test]
    fn values_survive_the_writer() {
        let graph = sample_graph();
        let bytes = save_workbook(&[
            ("Sources and Targets", node_rows(&graph)),
            ("Data Flows and Processes", edge_rows(&graph)),
        ])
        .unwrap();

        let workbook = parser::parse(&bytes).unwrap();
        let nodes = workbook.sheet("Sources and Targets").unwrap();
        // markup in cell text is escaped and restored
        assert_eq!(nodes.rows[1][1], "Alpha & Co");
        assert_eq!(nodes.rows[1][2], "first <node>");
        // positions come back as numeric text
        assert_eq!(nodes.rows[1][9], "12.5");
        assert_eq!(nodes.rows[2][9], "0");

        let flows = workbook.sheet("Data Flows and Processes").unwrap();
        assert_eq!(flows.rows[1][7], "500/day");
    }

    #[test]
    fn empty_graph_still_writes_headers() {
        let graph = FlowGraph::default();
        let bytes = save_workbook(&[
            ("Sources and Targets", node_rows(&graph)),
            ("Data Flows and Processes", edge_rows(&graph)),
        ])
        .unwrap();

        let workbook = parser::parse(&bytes).unwrap();
        assert_eq!(
            workbook.sheet("Sources and Targets").unwrap().rows.len(),
            1
        );
        assert_eq!(
            workbook
                .sheet("Data Flows and Processes")
                .unwrap()
                .rows
                .len(),
            1
        );
    }
}
