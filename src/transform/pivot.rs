//! Long-to-wide reshaping

use std::collections::BTreeSet;

use indexmap::IndexMap;
use regex::Regex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::model::{CellValue, Table};

/// Pivot `table` so each distinct `index` value is one row and each distinct
/// `columns` value is one column holding the matching `values` cell.
///
/// The index column comes first, pivoted columns follow in ascending order,
/// and rows are sorted by index. Absent combinations are `Null`; a repeated
/// `(index, column)` pair is an error.
pub fn pivot(table: &Table, index: &str, columns: &str, values: &str) -> Result<Table> {
    let index_idx = table.require_column(index)?;
    let columns_idx = table.require_column(columns)?;
    let values_idx = table.require_column(values)?;

    let mut headers: BTreeSet<String> = BTreeSet::new();
    let mut grid: IndexMap<String, FxHashMap<String, CellValue>> = IndexMap::new();

    for row in &table.rows {
        let key = row.cells[index_idx].display().into_owned();
        let column = row.cells[columns_idx].display().into_owned();
        headers.insert(column.clone());

        let entries = grid.entry(key.clone()).or_default();
        if entries.contains_key(&column) {
            return Err(PipelineError::DuplicatePivotEntry { index: key, column });
        }
        entries.insert(column, row.cells[values_idx].clone());
    }

    let mut out = Table::with_names(
        std::iter::once(index.to_string()).chain(headers.iter().cloned()),
    )?;
    for (key, mut entries) in grid {
        let mut cells = Vec::with_capacity(headers.len() + 1);
        cells.push(CellValue::String(key));
        cells.extend(
            headers
                .iter()
                .map(|h| entries.remove(h).unwrap_or(CellValue::Null)),
        );
        out.add_row(cells, 0)?;
    }
    out.sort_by_column(index)?;

    debug!(
        rows = out.row_count(),
        columns = out.column_count(),
        "pivoted table"
    );
    Ok(out)
}

/// Rename pivoted age columns: `Y15_24` becomes `age_group_15_24`, and every
/// name is lower-cased. The `keep` column is left untouched.
pub fn rename_age_columns(table: &mut Table, keep: &str) -> Result<()> {
    let leading_y = Regex::new("^Y")?;
    let renames: Vec<(String, String)> = table
        .columns
        .iter()
        .filter(|c| c.name != keep)
        .map(|c| {
            let renamed = leading_y.replace(&c.name, "age_group_").to_lowercase();
            (c.name.clone(), renamed)
        })
        .collect();

    for (from, to) in renames {
        table.rename(&from, &to)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_table() -> Table {
        let mut table =
            Table::with_names(["age_group", "country_code", "percentage_2019"]).unwrap();
        let rows = [
            ("Y15_24", "FR", Some(11.8)),
            ("Y0_14", "FR", Some(17.9)),
            ("Y0_14", "AT", Some(14.4)),
        ];
        for (age, code, pct) in rows {
            table
                .add_row(vec![age.into(), code.into(), pct.into()], 0)
                .unwrap();
        }
        table
    }

    #[test]
    fn test_pivot_sorts_rows_and_columns() {
        let wide = pivot(&long_table(), "country_code", "age_group", "percentage_2019").unwrap();
        assert_eq!(wide.column_names(), vec!["country_code", "Y0_14", "Y15_24"]);
        assert_eq!(
            wide.rows[0].cells,
            vec![CellValue::from("AT"), CellValue::Float(14.4), CellValue::Null]
        );
        assert_eq!(
            wide.rows[1].cells,
            vec![
                CellValue::from("FR"),
                CellValue::Float(17.9),
                CellValue::Float(11.8),
            ]
        );
    }

    #[test]
    fn test_pivot_rejects_duplicates() {
        let mut table = long_table();
        table
            .add_row(vec!["Y0_14".into(), "AT".into(), CellValue::Float(1.0)], 0)
            .unwrap();
        assert!(matches!(
            pivot(&table, "country_code", "age_group", "percentage_2019"),
            Err(PipelineError::DuplicatePivotEntry { .. })
        ));
    }

    #[test]
    fn test_rename_age_columns() {
        let mut wide =
            pivot(&long_table(), "country_code", "age_group", "percentage_2019").unwrap();
        wide.rename("Y15_24", "Y80_MAX").unwrap();
        rename_age_columns(&mut wide, "country_code").unwrap();
        assert_eq!(
            wide.column_names(),
            vec!["country_code", "age_group_0_14", "age_group_80_max"]
        );
    }
}
