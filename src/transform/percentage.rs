//! Percentage normalization for the population-by-age source

use regex::Regex;
use tracing::debug;

use crate::error::Result;
use crate::model::{ensure_unique, CellValue, Table};

/// Composite `age_group,country_code` column of the population source
pub const COMPOSITE_KEY_COLUMN: &str = "indic_de,geo\\time";

const KEY_PREFIX: &str = "^PC_";
const NON_NUMERIC: &str = r"[^0-9.]";

/// Trim whitespace around every header name
pub fn trim_headers(table: &mut Table) -> Result<()> {
    for col in &mut table.columns {
        col.name = col.name.trim().to_string();
    }
    ensure_unique(&table.columns)
}

/// Split a composite key into `(age_group, country_code)` on its last comma
pub fn split_composite_key(prefix: &Regex, key: &str) -> (String, Option<String>) {
    let key = prefix.replace(key, "");
    match key.rsplit_once(',') {
        Some((age_group, country_code)) => (age_group.to_string(), Some(country_code.to_string())),
        None => (key.to_string(), None),
    }
}

/// Coerce a percentage like `45.6 %` or `16.2 p` to a number.
///
/// Everything except ASCII digits and `.` is stripped first; anything that
/// still fails to parse becomes `Null`.
pub fn coerce_percentage(non_numeric: &Regex, raw: &CellValue) -> CellValue {
    match raw {
        CellValue::String(s) => non_numeric
            .replace_all(s, "")
            .parse::<f64>()
            .map(CellValue::Float)
            .unwrap_or(CellValue::Null),
        CellValue::Float(f) => CellValue::Float(*f),
        CellValue::Null => CellValue::Null,
    }
}

/// Reduce the raw population table to `age_group`, `country_code`,
/// `percentage_{year}` for ISO-2 countries only.
pub fn normalize_percentages(mut population: Table, year: &str) -> Result<Table> {
    trim_headers(&mut population)?;
    let key_idx = population.require_column(COMPOSITE_KEY_COLUMN)?;
    let value_idx = population.require_column(year)?;

    let prefix = Regex::new(KEY_PREFIX)?;
    let non_numeric = Regex::new(NON_NUMERIC)?;

    let value_column = format!("percentage_{}", year);
    let mut table = Table::with_names(["age_group", "country_code", value_column.as_str()])?;

    let total = population.row_count();
    for row in &population.rows {
        let (age_group, country_code) =
            split_composite_key(&prefix, &row.cells[key_idx].display());
        let Some(country_code) = country_code.filter(|c| c.chars().count() == 2) else {
            continue;
        };
        table.add_row(
            vec![
                CellValue::String(age_group),
                CellValue::String(country_code),
                coerce_percentage(&non_numeric, &row.cells[value_idx]),
            ],
            row.source_line,
        )?;
    }

    debug!(
        kept = table.row_count(),
        dropped = total - table.row_count(),
        "normalized percentages"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Delimiter};

    #[test]
    fn test_split_composite_key() {
        let prefix = Regex::new(KEY_PREFIX).unwrap();
        assert_eq!(
            split_composite_key(&prefix, "PC_Y15_24,DE"),
            ("Y15_24".to_string(), Some("DE".to_string()))
        );
        assert_eq!(
            split_composite_key(&prefix, "Y0_14"),
            ("Y0_14".to_string(), None)
        );
    }

    #[test]
    fn test_coerce_percentage() {
        let re = Regex::new(NON_NUMERIC).unwrap();
        assert_eq!(coerce_percentage(&re, &"45.6 %".into()), CellValue::Float(45.6));
        assert_eq!(coerce_percentage(&re, &"16.2 p".into()), CellValue::Float(16.2));
        assert_eq!(coerce_percentage(&re, &": ".into()), CellValue::Null);
        assert_eq!(coerce_percentage(&re, &"1.2.3".into()), CellValue::Null);
        assert_eq!(coerce_percentage(&re, &CellValue::Null), CellValue::Null);
    }

    #[test]
    fn test_normalize_single_row() {
        let text = "indic_de,geo\\time\t2019 \t2018\nPC_Y15_24,DE\t45.6 %\t44.0";
        let table = parse(text, Delimiter::Tab).unwrap();
        let table = normalize_percentages(table, "2019").unwrap();

        assert_eq!(
            table.column_names(),
            vec!["age_group", "country_code", "percentage_2019"]
        );
        assert_eq!(
            table.rows[0].cells,
            vec![
                CellValue::from("Y15_24"),
                CellValue::from("DE"),
                CellValue::Float(45.6),
            ]
        );
    }

    #[test]
    fn test_drops_aggregate_regions() {
        let text = "indic_de,geo\\time\t2019\nPC_Y0_14,EU27_2020\t15.2\nPC_Y0_14,AT\t14.4\nPC_Y0_14,DE\t: ";
        let table = normalize_percentages(parse(text, Delimiter::Tab).unwrap(), "2019").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].cells[1], CellValue::from("AT"));
        assert_eq!(table.rows[1].cells[2], CellValue::Null);
    }
}
