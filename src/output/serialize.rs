//! CSV serialization of result tables

use crate::error::{PipelineError, Result};
use crate::model::Table;

/// Serialize a table as comma-separated text: header row, no index column,
/// fields quoted only when they need it.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
    for row in &table.rows {
        writer.write_record(row.cells.iter().map(|c| c.display().into_owned()))?;
    }

    writer
        .into_inner()
        .map_err(|e| PipelineError::Serialize(csv::Error::from(e.into_error())))
}
