//! Generates worksheet XML from projected rows.
//!
//! Text cells use inline strings (`t="inlineStr"`) so no shared string
//! table is needed; numeric cells (positions) are written as numbers.

use crate::builder::SheetCell;
use crate::cell_ref::cell_ref_string;

/// Write a complete worksheet XML string from header + data rows.
pub(super) fn write_sheet_xml(rows: &[Vec<SheetCell>]) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    out.push('\n');

    // <dimension>
    let max_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if !rows.is_empty() && max_cols > 0 {
        #[allow(clippy::cast_possible_truncation)]
        let end = cell_ref_string(max_cols as u32 - 1, rows.len() as u32 - 1);
        out.push_str(&format!("<dimension ref=\"A1:{end}\"/>\n"));
    }

    out.push_str("<sheetData>\n");
    for (row_idx, row) in rows.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let r = row_idx as u32;
        out.push_str(&format!("<row r=\"{}\">", r + 1));
        for (col_idx, cell) in row.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let c = col_idx as u32;
            write_cell(&mut out, r, c, cell);
        }
        out.push_str("</row>\n");
    }
    out.push_str("</sheetData>\n");

    out.push_str("</worksheet>");
    out
}

/// Write a single `<c>` element. Empty text cells are omitted; the
/// reader's dense grid restores them as empty strings.
fn write_cell(out: &mut String, row: u32, col: u32, cell: &SheetCell) {
    match cell {
        SheetCell::Text(s) => {
            if s.is_empty() {
                return;
            }
            out.push_str(&format!(
                "<c r=\"{}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                cell_ref_string(col, row),
                xml_escape(s)
            ));
        }
        SheetCell::Number(n) => {
            out.push_str(&format!(
                "<c r=\"{}\"><v>{n}</v></c>",
                cell_ref_string(col, row)
            ));
        }
    }
}

/// Minimal XML escaping for text content.
fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
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
    fn writes_inline_strings_and_numbers() {
        let rows = vec![
            vec![SheetCell::Text("key".into()), SheetCell::Text("x".into())],
            vec![SheetCell::Text("N1".into()), SheetCell::Number(12.5)],
        ];
        let xml = write_sheet_xml(&rows);
        assert!(xml.contains(r#"<c r="A1" t="inlineStr"><is><t>key</t></is></c>"#));
        assert!(xml.contains(r#"<c r="B2"><v>12.5</v></c>"#));
        assert!(xml.contains(r#"<dimension ref="A1:B2"/>"#));
    }

    #[test]
    fn escapes_markup_in_text() {
        let rows = vec![vec![SheetCell::Text("a & <b>".into())]];
        let xml = write_sheet_xml(&rows);
        assert!(xml.contains("a &amp; &lt;b&gt;"));
    }

    #[test]
    fn empty_text_cells_are_omitted() {
        let rows = vec![vec![
            SheetCell::Text(String::new()),
            SheetCell::Text("x".into()),
        ]];
        let xml = write_sheet_xml(&rows);
        assert!(!xml.contains(r#"r="A1""#));
        assert!(xml.contains(r#"r="B1""#));
    }
}
