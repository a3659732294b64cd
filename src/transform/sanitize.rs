//! Degenerate row filtering

use tracing::debug;

use crate::model::Table;

/// Default number of distinct values a row must exceed to be kept
pub const DEFAULT_MIN_DISTINCT: usize = 1;

/// Keep only rows with more than `min_distinct` distinct non-null values.
///
/// Trailing blank lines and padding rows collapse to a single repeated value
/// and are removed here, before any join sees them.
pub fn filter_degenerate(mut table: Table, min_distinct: usize) -> Table {
    let before = table.row_count();
    table.rows.retain(|row| row.distinct_values() > min_distinct);
    debug!(
        dropped = before - table.row_count(),
        kept = table.row_count(),
        "filtered degenerate rows"
    );
    table
}
