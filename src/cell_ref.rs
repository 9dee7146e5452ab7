//! Utilities for parsing and writing Excel-style cell references.

/// Parse a cell reference like "A1" into (col, row) where col and row are 0-indexed.
pub fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for ch in cell_ref.trim().chars() {
        if ch == '$' {
            continue;
        }
        if ch.is_ascii_alphabetic() {
            let upper = ch.to_ascii_uppercase();
            col = col * 26 + (upper as u32 - 'A' as u32 + 1);
            saw_col = true;
        } else if ch.is_ascii_digit() {
            row = row * 10 + (ch as u32 - '0' as u32);
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row {
        return None;
    }

    Some((col.saturating_sub(1), row.saturating_sub(1)))
}

/// Parse a cell reference from raw bytes (ASCII) into (col, row), 0-indexed.
///
/// Bytes equivalent of [`parse_cell_ref`] for use with raw XML attribute
/// values (e.g., `attr.value` from quick-xml).
pub fn parse_cell_ref_bytes(ref_bytes: &[u8]) -> Option<(u32, u32)> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for &b in ref_bytes {
        if b == b'$' {
            continue;
        }
        if b.is_ascii_alphabetic() {
            let upper = if b.is_ascii_lowercase() { b - 32 } else { b };
            col = col * 26 + (u32::from(upper - b'A') + 1);
            saw_col = true;
        } else if b.is_ascii_digit() {
            row = row * 10 + u32::from(b - b'0');
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row {
        return None;
    }

    Some((col.saturating_sub(1), row.saturating_sub(1)))
}

/// Convert a 0-indexed column number to its letter form ("A", "B", ..., "AA").
pub fn col_to_letter(col: u32) -> String {
    let mut out = String::new();
    let mut n = col + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        #[allow(clippy::cast_possible_truncation)]
        out.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    out
}

/// Format a (col, row) pair (0-indexed) as an "A1" style reference.
pub fn cell_ref_string(col: u32, row: u32) -> String {
    format!("{}{}", col_to_letter(col), row + 1)
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
    use test_case::test_case;

    #[test_case("A1", 0, 0)]
    #[test_case("b3", 1, 2)]
    #[test_case("aa10", 26, 9)]
    fn parses_mixed_case(r: &str, col: u32, row: u32) {
        assert_eq!(parse_cell_ref(r), Some((col, row)));
    }

    #[test]
    fn parses_simple_refs() {
        assert_eq!(parse_cell_ref("A1"), Some((0, 0)));
        assert_eq!(parse_cell_ref("B3"), Some((1, 2)));
        assert_eq!(parse_cell_ref("AA10"), Some((26, 9)));
        assert_eq!(parse_cell_ref("$C$2"), Some((2, 1)));
    }

    #[test]
    fn rejects_incomplete_refs() {
        assert_eq!(parse_cell_ref("A"), None);
        assert_eq!(parse_cell_ref("12"), None);
        assert_eq!(parse_cell_ref(""), None);
    }

    #[test]
    fn bytes_and_str_agree() {
        for r in ["A1", "Z99", "AB12"] {
            assert_eq!(parse_cell_ref(r), parse_cell_ref_bytes(r.as_bytes()));
        }
    }

    #[test]
    fn col_letters_round_trip() {
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(25), "Z");
        assert_eq!(col_to_letter(26), "AA");
        assert_eq!(cell_ref_string(1, 0), "B1");
    }
}
