//! Test fixtures for generating valid XLSX files in memory.
//!
//! Builds small workbooks programmatically so parser and pipeline
//! tests have known inputs. Strings go through the shared string
//! table, matching what spreadsheet applications emit.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

/// A fixture cell value.
#[derive(Debug, Clone)]
pub enum Cell {
    /// A string written through the shared string table.
    Str(String),
    /// A string written as an inline string.
    Inline(String),
    /// A numeric value.
    Num(f64),
    /// An empty self-closing cell.
    Empty,
}

/// Shared-string cell shorthand.
pub fn s(value: &str) -> Cell {
    Cell::Str(value.to_string())
}

/// Numeric cell shorthand.
pub fn n(value: f64) -> Cell {
    Cell::Num(value)
}

/// Convert a grid of string literals into shared-string cells.
pub fn text_rows(rows: &[&[&str]]) -> Vec<Vec<Cell>> {
    rows.iter()
        .map(|row| row.iter().map(|v| s(v)).collect())
        .collect()
}

/// Builder for a complete multi-sheet XLSX file.
#[derive(Debug, Default)]
pub struct WorkbookBuilder {
    sheets: Vec<(String, Vec<Vec<Cell>>)>,
}

impl WorkbookBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet with dense row-major cells.
    #[must_use]
    pub fn sheet(mut self, name: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.push((name.to_string(), rows));
        self
    }

    /// Build the XLSX file as bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let mut shared: Vec<String> = Vec::new();
        for (_, rows) in &self.sheets {
            for row in rows {
                for cell in row {
                    if let Cell::Str(v) = cell {
                        if !shared.contains(v) {
                            shared.push(v.clone());
                        }
                    }
                }
            }
        }

        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let _ = zip.start_file("[Content_Types].xml", options);
        let _ = zip.write_all(content_types(self.sheets.len(), !shared.is_empty()).as_bytes());

        let _ = zip.start_file("_rels/.rels", options);
        let _ = zip.write_all(ROOT_RELS.as_bytes());

        let _ = zip.start_file("xl/_rels/workbook.xml.rels", options);
        let _ = zip.write_all(workbook_rels(self.sheets.len(), !shared.is_empty()).as_bytes());

        let _ = zip.start_file("xl/workbook.xml", options);
        let _ = zip.write_all(workbook_xml(&self.sheets).as_bytes());

        let _ = zip.start_file("xl/styles.xml", options);
        let _ = zip.write_all(STYLES.as_bytes());

        if !shared.is_empty() {
            let _ = zip.start_file("xl/sharedStrings.xml", options);
            let _ = zip.write_all(shared_strings_xml(&shared).as_bytes());
        }

        for (i, (_, rows)) in self.sheets.iter().enumerate() {
            let _ = zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options);
            let _ = zip.write_all(sheet_xml(rows, &shared).as_bytes());
        }

        let cursor = zip.finish().expect("Failed to finish ZIP");
        cursor.into_inner()
    }
}

/// Build the canonical two-sheet workbook the application expects,
/// from string grids.
pub fn flowsheet_xlsx(nodes: &[&[&str]], flows: &[&[&str]]) -> Vec<u8> {
    WorkbookBuilder::new()
        .sheet("Sources and Targets", text_rows(nodes))
        .sheet("Data Flows and Processes", text_rows(flows))
        .build()
}

fn content_types(sheet_count: usize, has_shared: bool) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
    if has_shared {
        xml.push_str(r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#);
    }
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            i
        ));
    }
    xml.push_str("</Types>");
    xml
}

const ROOT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#
);

const STYLES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>"#,
    r#"<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>"#,
    r#"<borders count="1"><border/></borders>"#,
    r#"<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellXfs>"#,
    r#"</styleSheet>"#
);

fn workbook_rels(sheet_count: usize, has_shared: bool) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    let mut rid = 1;
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            rid, i
        ));
        rid += 1;
    }
    xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        rid
    ));
    rid += 1;
    if has_shared {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
            rid
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn workbook_xml(sheets: &[(String, Vec<Vec<Cell>>)]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    xml.push_str("<sheets>");
    for (i, (name, _)) in sheets.iter().enumerate() {
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape_xml(name),
            i + 1,
            i + 1
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn shared_strings_xml(strings: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(&format!(
        r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
        strings.len(),
        strings.len()
    ));
    for v in strings {
        xml.push_str(&format!(
            r#"<si><t xml:space="preserve">{}</t></si>"#,
            escape_xml(v)
        ));
    }
    xml.push_str("</sst>");
    xml
}

fn sheet_xml(rows: &[Vec<Cell>], shared: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    xml.push_str("<sheetData>");
    for (r, row) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, cell) in row.iter().enumerate() {
            let cell_ref = format!("{}{}", col_letter(c as u32), r + 1);
            match cell {
                Cell::Str(v) => {
                    let idx = shared.iter().position(|x| x == v).unwrap_or(0);
                    xml.push_str(&format!(r#"<c r="{}" t="s"><v>{}</v></c>"#, cell_ref, idx));
                }
                Cell::Inline(v) => {
                    xml.push_str(&format!(
                        r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                        cell_ref,
                        escape_xml(v)
                    ));
                }
                Cell::Num(v) => {
                    xml.push_str(&format!(r#"<c r="{}"><v>{}</v></c>"#, cell_ref, v));
                }
                Cell::Empty => {
                    xml.push_str(&format!(r#"<c r="{}"/>"#, cell_ref));
                }
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

fn col_letter(mut col: u32) -> String {
    let mut out = String::new();
    loop {
        out.insert(0, char::from(b'A' + (col % 26) as u8));
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    out
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
