//! Worksheet parsing - resolves one sheet's XML into a string grid.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::parse_cell_ref_bytes;
use crate::error::Result;

/// XLSX sheet size limits; cells beyond them are dropped.
const MAX_ROWS: u32 = 1_048_576;
const MAX_COLS: u32 = 16_384;

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone)]
enum CellTypeTag {
    Shared,
    Bool,
    Text,
}

fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        // str, inlineStr, e, and untyped numbers all pass through as text
        _ => CellTypeTag::Text,
    }
}

struct PendingCell {
    row: u32,
    col: u32,
    tag: CellTypeTag,
}

/// Parse one worksheet part into a dense row-major grid of display
/// strings. Gaps between referenced cells become empty strings.
pub(super) fn parse_sheet_grid<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    shared_strings: &[String],
) -> Result<Vec<Vec<String>>> {
    let file = archive.by_name(path)?;
    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut grid: Vec<Vec<String>> = Vec::new();
    let mut buf = Vec::new();
    let mut current_row: u32 = 0;
    let mut next_col: u32 = 0;
    let mut pending: Option<PendingCell> = None;
    let mut value = String::new();
    let mut in_value = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(ref event @ (Event::Start(_) | Event::Empty(_))) => {
                let (Event::Start(ref e) | Event::Empty(ref e)) = event else {
                    continue;
                };
                let is_empty_element = matches!(event, Event::Empty(_));

                match e.local_name().as_ref() {
                    b"row" => {
                        // 1-based r attribute; without it, rows advance
                        // sequentially past the previous one.
                        let mut row = current_row.saturating_add(1);
                        for attr in e.attributes().flatten() {
                            if attr.key.as_ref() == b"r" {
                                if let Some(r) = parse_u32_bytes(&attr.value) {
                                    row = r;
                                }
                            }
                        }
                        current_row = row;
                        next_col = 0;
                    }
                    b"c" => {
                        let mut col = next_col;
                        let mut row = current_row.saturating_sub(1);
                        let mut tag = CellTypeTag::Text;

                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"r" => {
                                    if let Some((c, r)) = parse_cell_ref_bytes(&attr.value) {
                                        col = c;
                                        row = r;
                                    }
                                }
                                b"t" => tag = parse_cell_type_tag(&attr.value),
                                _ => {}
                            }
                        }
                        next_col = col.saturating_add(1);

                        // Self-closing cells carry no value; the grid
                        // default already covers them.
                        if !is_empty_element {
                            value.clear();
                            pending = Some(PendingCell { row, col, tag });
                        }
                    }
                    b"v" if pending.is_some() => in_value = true,
                    b"t" if pending.is_some() => in_value = true,
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) if in_value => {
                if let Ok(text) = e.unescape() {
                    value.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    if let Some(cell) = pending.take() {
                        let resolved = resolve_value(&value, cell.tag, shared_strings);
                        set_cell(&mut grid, cell.row, cell.col, resolved);
                    }
                    in_value = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(grid)
}

/// Resolve raw cell text into its display string.
fn resolve_value(raw: &str, tag: CellTypeTag, shared_strings: &[String]) -> String {
    match tag {
        CellTypeTag::Shared => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|idx| shared_strings.get(idx))
            .cloned()
            .unwrap_or_default(),
        CellTypeTag::Bool => {
            if raw.trim() == "1" || raw.trim().eq_ignore_ascii_case("true") {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        CellTypeTag::Text => raw.to_string(),
    }
}

/// Place a value at (row, col), growing the grid with empty strings.
fn set_cell(grid: &mut Vec<Vec<String>>, row: u32, col: u32, value: String) {
    if row >= MAX_ROWS || col >= MAX_COLS {
        return;
    }
    let row = row as usize;
    let col = col as usize;
    if grid.len() <= row {
        grid.resize_with(row + 1, Vec::new);
    }
    if let Some(cells) = grid.get_mut(row) {
        if cells.len() <= col {
            cells.resize_with(col + 1, String::new);
        }
        if let Some(cell) = cells.get_mut(col) {
            *cell = value;
        }
    }
}

fn parse_u32_bytes(value: &[u8]) -> Option<u32> {
    let mut num: u32 = 0;
    let mut seen = false;
    for &b in value {
        if !b.is_ascii_digit() {
            return None;
        }
        seen = true;
        num = num.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }
    seen.then_some(num)
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
    fn grid_fills_gaps_with_empty_strings() {
        let mut grid = Vec::new();
        set_cell(&mut grid, 1, 2, "x".to_string());
        assert_eq!(grid.len(), 2);
        assert!(grid[0].is_empty());
        assert_eq!(grid[1], vec!["", "", "x"]);
    }

    #[test]
    fn shared_string_resolution() {
        let shared = vec!["alpha".to_string(), "beta".to_string()];
        assert_eq!(resolve_value("1", CellTypeTag::Shared, &shared), "beta");
        assert_eq!(resolve_value("9", CellTypeTag::Shared, &shared), "");
    }

    #[test]
    fn boolean_resolution() {
        assert_eq!(resolve_value("1", CellTypeTag::Bool, &[]), "TRUE");
        assert_eq!(resolve_value("0", CellTypeTag::Bool, &[]), "FALSE");
    }
}
