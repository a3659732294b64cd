//! Data model for tabular data representation

mod schema;
mod table;

pub use schema::{ensure_unique, Column};
pub use table::{CellValue, Row, Table};
