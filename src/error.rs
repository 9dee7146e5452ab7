//! Structured error types for flowsheet.
//!
//! Structural input failures (unreadable workbook, missing sheet) are
//! errors; row-level rejections during graph building are data and
//! never surface here.

/// All errors that can occur while reading or writing workbooks.
#[derive(Debug, thiserror::Error)]
pub enum FlowsheetError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error (unreadable workbook bytes).
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A required sheet is absent from the workbook.
    #[error("Required sheet \"{0}\" not found in the Excel file")]
    SheetMissing(String),

    /// General parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FlowsheetError>;

impl From<String> for FlowsheetError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for FlowsheetError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<FlowsheetError> for wasm_bindgen::JsValue {
    fn from(e: FlowsheetError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
