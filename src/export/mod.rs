//! XLSX export pipeline.
//!
//! Unlike a patching exporter, this writes a complete fresh package:
//! the output workbook's sheet and column layout is fixed and
//! independent of whatever the input file looked like.

mod package;
mod sheet_writer;

use crate::builder::SheetCell;
use crate::error::Result;

/// Serialize named sheets of projected rows into XLSX bytes.
///
/// Sheets appear in the workbook in slice order.
pub fn save_workbook(sheets: &[(&str, Vec<Vec<SheetCell>>)]) -> Result<Vec<u8>> {
    let parts: Vec<(&str, String)> = sheets
        .iter()
        .map(|(name, rows)| (*name, sheet_writer::write_sheet_xml(rows)))
        .collect();
    package::write_package(&parts)
}
