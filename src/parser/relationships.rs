//! Workbook-level part discovery: relationships, sheet list, shared strings.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::error::Result;

/// Sheet metadata from xl/workbook.xml.
pub(super) struct SheetInfo {
    pub name: String,
    pub path: String,
}

/// Paths resolved from xl/_rels/workbook.xml.rels.
///
/// Targets are resolved relative to the xl/ directory and stored as
/// full package paths.
#[derive(Default, Debug)]
pub(super) struct WorkbookRelationships {
    /// rId -> full worksheet path, e.g. "rId1" -> "xl/worksheets/sheet1.xml".
    pub worksheets: HashMap<String, String>,
    /// Path to the shared strings part, when present.
    pub shared_strings: Option<String>,
}

fn attr_string(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| std::str::from_utf8(&a.value).ok().map(ToString::to_string))
}

/// Parse xl/_rels/workbook.xml.rels. The file is optional; defaults
/// are used when it is absent.
pub(super) fn parse_workbook_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> WorkbookRelationships {
    let mut rels = WorkbookRelationships::default();

    let Ok(file) = archive.by_name("xl/_rels/workbook.xml.rels") else {
        return rels;
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e)) => {
                if e.local_name().as_ref() != b"Relationship" {
                    buf.clear();
                    continue;
                }
                let id = attr_string(e, b"Id").unwrap_or_default();
                let target = attr_string(e, b"Target").unwrap_or_default();
                let rel_type = attr_string(e, b"Type").unwrap_or_default();

                // Targets are relative to xl/ unless absolute.
                let full_path = match target.strip_prefix('/') {
                    Some(stripped) => stripped.to_string(),
                    None => format!("xl/{target}"),
                };

                if rel_type.contains("worksheet") && !id.is_empty() && !target.is_empty() {
                    rels.worksheets.insert(id, full_path);
                } else if rel_type.contains("sharedStrings") {
                    rels.shared_strings = Some(full_path);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    rels
}

/// Read sheet names and worksheet paths from xl/workbook.xml.
///
/// A workbook without this part is not a workbook at all, so a miss
/// here is an error (unreadable bytes, not a missing-sheet condition).
pub(super) fn sheet_info<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    worksheets: &HashMap<String, String>,
) -> Result<Vec<SheetInfo>> {
    let file = archive.by_name("xl/workbook.xml")?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut sheets = Vec::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"sheet" {
                    let mut name = String::new();
                    let mut r_id = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => {
                                name = std::str::from_utf8(&attr.value)
                                    .unwrap_or("")
                                    .to_string();
                            }
                            // r:id is namespace prefixed
                            key if key.ends_with(b":id") || key == b"id" => {
                                r_id = std::str::from_utf8(&attr.value)
                                    .unwrap_or("")
                                    .to_string();
                            }
                            _ => {}
                        }
                    }

                    if !name.is_empty() {
                        // Fall back to the conventional path when the
                        // relationships part was missing or incomplete.
                        let path = worksheets.get(&r_id).cloned().unwrap_or_else(|| {
                            let idx = sheets.len() + 1;
                            format!("xl/worksheets/sheet{idx}.xml")
                        });
                        sheets.push(SheetInfo { name, path });
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// Parse the shared string table. Optional part; absent means no
/// shared strings are referenced.
pub(super) fn parse_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: Option<&str>,
) -> Vec<String> {
    let sst_path = path.unwrap_or("xl/sharedStrings.xml");
    let Ok(file) = archive.by_name(sst_path) else {
        return Vec::new();
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut strings = Vec::new();
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_t = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_t => {
                if let Ok(text) = e.unescape() {
                    // Rich-text runs concatenate into one entry.
                    current.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(current.clone());
                    in_si = false;
                }
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    strings
}
