//! Inner join of two tables on key columns

use std::borrow::Cow;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::Result;
use crate::model::Table;

/// Suffixes appended to non-key column names present on both sides
const LEFT_SUFFIX: &str = "_x";
const RIGHT_SUFFIX: &str = "_y";

/// Join predicate: `left.<left> == right.<right>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinKey {
    pub left: String,
    pub right: String,
}

impl JoinKey {
    /// Key columns with different names on each side
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Key column shared by name; the output keeps a single copy of it
    pub fn on(column: impl Into<String>) -> Self {
        let column = column.into();
        Self {
            left: column.clone(),
            right: column,
        }
    }

    fn is_shared(&self) -> bool {
        self.left == self.right
    }
}

/// Inner-join `left` with `right`.
///
/// Keys match by string equality of their displayed value; null keys never
/// match. Rows without a partner on the other side are dropped. Output rows
/// follow left order, each followed by its matches in right order. Output
/// columns are the left columns then the right ones, minus the right key for
/// a shared-name key.
pub fn inner_join(left: &Table, right: &Table, key: &JoinKey) -> Result<Table> {
    let left_key = left.require_column(&key.left)?;
    let right_key = right.require_column(&key.right)?;

    let right_keep: Vec<usize> = (0..right.column_count())
        .filter(|&i| !(key.is_shared() && i == right_key))
        .collect();

    let left_names: FxHashSet<&str> = left.column_names().into_iter().collect();
    let right_names: FxHashSet<&str> = right_keep
        .iter()
        .map(|&i| right.columns[i].name.as_str())
        .collect();

    let mut names: Vec<String> = left
        .columns
        .iter()
        .map(|c| {
            if right_names.contains(c.name.as_str()) {
                format!("{}{}", c.name, LEFT_SUFFIX)
            } else {
                c.name.clone()
            }
        })
        .collect();
    names.extend(right_keep.iter().map(|&i| {
        let name = &right.columns[i].name;
        if left_names.contains(name.as_str()) {
            format!("{}{}", name, RIGHT_SUFFIX)
        } else {
            name.clone()
        }
    }));

    let mut index: FxHashMap<Cow<'_, str>, Vec<usize>> = FxHashMap::default();
    for (i, row) in right.rows.iter().enumerate() {
        if let Some(cell) = row.get(right_key).filter(|c| !c.is_null()) {
            index.entry(cell.display()).or_default().push(i);
        }
    }

    let mut out = Table::with_names(names)?;
    for row in &left.rows {
        let Some(cell) = row.get(left_key).filter(|c| !c.is_null()) else {
            continue;
        };
        let Some(matches) = index.get(cell.display().as_ref()) else {
            continue;
        };
        for &m in matches {
            let partner = &right.rows[m];
            let mut cells = row.cells.clone();
            cells.extend(right_keep.iter().map(|&i| partner.cells[i].clone()));
            out.add_row(cells, row.source_line)?;
        }
    }

    debug!(
        left_rows = left.row_count(),
        right_rows = right.row_count(),
        joined_rows = out.row_count(),
        left_key = %key.left,
        right_key = %key.right,
        "inner join"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::model::CellValue;
    use crate::parser::{parse, Delimiter};

    fn table(text: &str) -> Table {
        parse(text, Delimiter::Comma).unwrap()
    }

    #[test]
    fn test_inner_join_drops_unmatched() {
        let left = table("code,name\nDE,Germany\nIT,Italy");
        let right = table("code,population\nDE,83\nFR,67");
        let joined = inner_join(&left, &right, &JoinKey::on("code")).unwrap();

        assert_eq!(joined.column_names(), vec!["code", "name", "population"]);
        assert_eq!(joined.row_count(), 1);
        assert_eq!(joined.rows[0].cells[0], CellValue::from("DE"));
    }

    #[test]
    fn test_single_column_tables() {
        let left = table("code\nDE");
        let right = table("code\nDE\nFR");
        let joined = inner_join(&left, &right, &JoinKey::on("code")).unwrap();
        assert_eq!(joined.row_count(), 1);
        assert_eq!(joined.column_names(), vec!["code"]);
    }

    #[test]
    fn test_different_key_names_keep_both_columns() {
        let left = table("country_code,value\nDE,1\nFR,2");
        let right = table("country_code_3_digit,country_code_2_digit\nDEU,DE\nFRA,FR");
        let joined = inner_join(
            &left,
            &right,
            &JoinKey::new("country_code", "country_code_2_digit"),
        )
        .unwrap();

        assert_eq!(
            joined.column_names(),
            vec!["country_code", "value", "country_code_3_digit", "country_code_2_digit"]
        );
        assert_eq!(joined.rows[1].cells[2], CellValue::from("FRA"));
    }

    #[test]
    fn test_one_to_many_follows_left_then_right_order() {
        let left = table("k,l\nb,1\na,2");
        let right = table("k,r\na,x\nb,y\nb,z");
        let joined = inner_join(&left, &right, &JoinKey::on("k")).unwrap();
        let pairs: Vec<(String, String)> = joined
            .rows
            .iter()
            .map(|r| (r.cells[1].to_string(), r.cells[2].to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("1".to_string(), "y".to_string()),
                ("1".to_string(), "z".to_string()),
                ("2".to_string(), "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_overlapping_columns_get_suffixes() {
        let left = table("k,population\na,1");
        let right = table("k,population\na,2");
        let joined = inner_join(&left, &right, &JoinKey::on("k")).unwrap();
        assert_eq!(joined.column_names(), vec!["k", "population_x", "population_y"]);
    }

    #[test]
    fn test_null_keys_never_match() {
        let mut left = Table::with_names(["k", "v"]).unwrap();
        left.add_row(vec![CellValue::Null, "1".into()], 0).unwrap();
        let mut right = Table::with_names(["k", "w"]).unwrap();
        right.add_row(vec![CellValue::Null, "2".into()], 0).unwrap();
        let joined = inner_join(&left, &right, &JoinKey::on("k")).unwrap();
        assert_eq!(joined.row_count(), 0);
    }

    #[test]
    fn test_missing_key_column() {
        let left = table("a\n1");
        let right = table("b\n1");
        assert!(matches!(
            inner_join(&left, &right, &JoinKey::on("a")),
            Err(PipelineError::MissingColumn(name)) if name == "a"
        ));
    }
}
