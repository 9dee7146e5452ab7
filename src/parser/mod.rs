//! XLSX workbook reader.
//!
//! Reads the ZIP package and resolves every worksheet into a dense
//! row-major string grid. Styling, themes, merges and the rest of the
//! OOXML surface are deliberately ignored: the graph builder only ever
//! sees cell text.

mod relationships;
mod sheet;

use std::io::Cursor;
use zip::ZipArchive;

use crate::error::Result;

/// One worksheet, resolved to display strings.
///
/// `rows` is dense: gaps between referenced cells are filled with
/// empty strings, so `rows[r][c]` is positionally meaningful.
#[derive(Debug, Clone)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// A parsed workbook: worksheets in workbook order.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<SheetGrid>,
}

impl Workbook {
    /// Exact-name sheet lookup.
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&SheetGrid> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Names of all sheets, in workbook order.
    #[must_use]
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }
}

/// Parse an XLSX file from bytes.
pub fn parse(data: &[u8]) -> Result<Workbook> {
    let cursor = Cursor::new(data);
    let mut archive = ZipArchive::new(cursor)?;

    // Relationships first: they carry the real part paths.
    let rels = relationships::parse_workbook_relationships(&mut archive);
    let shared_strings =
        relationships::parse_shared_strings(&mut archive, rels.shared_strings.as_deref());
    let sheet_info = relationships::sheet_info(&mut archive, &rels.worksheets)?;

    let mut sheets = Vec::with_capacity(sheet_info.len());
    for info in sheet_info {
        let rows = sheet::parse_sheet_grid(&mut archive, &info.path, &shared_strings)?;
        sheets.push(SheetGrid {
            name: info.name,
            rows,
        });
    }

    Ok(Workbook { sheets })
}
