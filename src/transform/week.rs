//! ISO week derivation for the date dimension

use std::cmp::Ordering;

use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::debug;

use crate::error::Result;
use crate::model::{CellValue, Table};

/// Format a year and week number as `YYYY-Www`
pub fn year_week(year: &str, week_of_year: &str) -> String {
    format!("{}-W{:0>2}", year, week_of_year)
}

/// Chronological order when both sides are ISO dates, lexical otherwise
fn compare_dates(a: &str, b: &str) -> Ordering {
    match (
        NaiveDate::parse_from_str(a, "%Y-%m-%d"),
        NaiveDate::parse_from_str(b, "%Y-%m-%d"),
    ) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}

#[derive(Debug)]
struct WeekBounds {
    start: Option<String>,
    end: Option<String>,
    source_line: usize,
}

impl WeekBounds {
    fn observe(&mut self, date: &str) {
        if self
            .start
            .as_deref()
            .map_or(true, |s| compare_dates(date, s) == Ordering::Less)
        {
            self.start = Some(date.to_string());
        }
        if self
            .end
            .as_deref()
            .map_or(true, |e| compare_dates(date, e) == Ordering::Greater)
        {
            self.end = Some(date.to_string());
        }
    }
}

/// Collapse a date dimension (`date`, `year`, `week_of_year`, ...) into one
/// row per week: `year_week`, `week_end_date`, `week_start_date`.
///
/// Weeks keep the order of their first date in the input.
pub fn derive_weeks(dates: &Table) -> Result<Table> {
    let date_idx = dates.require_column("date")?;
    let year_idx = dates.require_column("year")?;
    let week_idx = dates.require_column("week_of_year")?;

    let mut weeks: IndexMap<String, WeekBounds> = IndexMap::new();
    for row in &dates.rows {
        let key = year_week(&row.cells[year_idx].display(), &row.cells[week_idx].display());
        let bounds = weeks.entry(key).or_insert_with(|| WeekBounds {
            start: None,
            end: None,
            source_line: row.source_line,
        });
        if let CellValue::String(date) = &row.cells[date_idx] {
            bounds.observe(date);
        }
    }

    let mut table = Table::with_names(["year_week", "week_end_date", "week_start_date"])?;
    for (key, bounds) in weeks {
        table.add_row(
            vec![
                CellValue::String(key),
                bounds.end.into(),
                bounds.start.into(),
            ],
            bounds.source_line,
        )?;
    }
    table.dedup();

    debug!(weeks = table.row_count(), "derived week boundaries");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Delimiter};

    #[test]
    fn test_year_week_padding() {
        assert_eq!(year_week("2021", "1"), "2021-W01");
        assert_eq!(year_week("2020", "53"), "2020-W53");
    }

    #[test]
    fn test_first_week_of_2021() {
        let mut text = String::from("date,year,week_of_year,day_name");
        for day in 4..=10 {
            text.push_str(&format!("\n2021-01-{:02},2021,1,d{}", day, day));
        }
        text.push_str("\n2021-01-11,2021,2,Monday");

        let table = derive_weeks(&parse(&text, Delimiter::Comma).unwrap()).unwrap();
        assert_eq!(
            table.column_names(),
            vec!["year_week", "week_end_date", "week_start_date"]
        );
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.rows[0].cells,
            vec![
                CellValue::from("2021-W01"),
                CellValue::from("2021-01-10"),
                CellValue::from("2021-01-04"),
            ]
        );
        assert_eq!(table.rows[1].cells[0], CellValue::from("2021-W02"));
    }

    #[test]
    fn test_bounds_ignore_input_order() {
        let text = "date,year,week_of_year\n2021-01-07,2021,1\n2021-01-04,2021,1\n2021-01-10,2021,1";
        let table = derive_weeks(&parse(text, Delimiter::Comma).unwrap()).unwrap();
        assert_eq!(table.rows[0].cells[1], CellValue::from("2021-01-10"));
        assert_eq!(table.rows[0].cells[2], CellValue::from("2021-01-04"));
    }

    #[test]
    fn test_missing_week_column() {
        let table = parse("date,year\n2021-01-04,2021", Delimiter::Comma).unwrap();
        assert!(derive_weeks(&table).is_err());
    }
}
