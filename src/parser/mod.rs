//! Parser layer turning raw blob text into tables

mod delimited;

use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::model::{CellValue, Table};

pub use delimited::split_line;

/// Field separator of a source object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    /// Infer the delimiter from an object name: `.csv` is comma, anything else tab
    pub fn from_object_name(name: &str) -> Self {
        if name.ends_with(".csv") {
            Delimiter::Comma
        } else {
            Delimiter::Tab
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }
}

/// Decode fetched bytes as UTF-8, dropping a leading byte-order mark
pub fn decode_text(object: &str, bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec()).map_err(|_| PipelineError::Decode(object.to_string()))
}

/// Parse delimited text into a table.
///
/// Carriage returns and double quotes are removed before splitting, so
/// quoting is never honored. Line 0 is the header. Empty text yields a
/// table with no columns.
pub fn parse(text: &str, delimiter: Delimiter) -> Result<Table> {
    if text.is_empty() {
        return Ok(Table::default());
    }

    let normalized: String = text.chars().filter(|c| *c != '\r' && *c != '"').collect();
    let mut lines = normalized.split('\n');

    let header = match lines.next() {
        Some(line) => split_line(line, delimiter),
        None => return Ok(Table::default()),
    };
    let mut table = Table::with_names(header)?;

    for (i, line) in lines.enumerate() {
        let cells: Vec<CellValue> = split_line(line, delimiter)
            .into_iter()
            .map(CellValue::String)
            .collect();
        // +2 for 1-indexing and header
        table.add_row(cells, i + 2)?;
    }

    debug!(
        columns = table.column_count(),
        rows = table.row_count(),
        "parsed delimited text"
    );
    Ok(table)
}
