//! Output: table serialization and run summaries

mod serialize;

use std::io::{IsTerminal, Write};

use anyhow::Result;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::config::OutputFormat;
use crate::model::Table;
use crate::pipeline::Outcome;

pub use serialize::to_csv_bytes;

/// Summary of one pipeline request
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub pipeline: String,
    pub outcome: Outcome,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    #[serde(skip)]
    pub table: Option<Table>,
}

/// Render a table for terminal preview
pub fn preview_table(table: &Table) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.columns.iter().map(|c| c.name.clone()));
    for row in &table.rows {
        builder.push_record(row.cells.iter().map(|c| c.display().into_owned()));
    }
    let mut rendered = builder.build();
    rendered.with(Style::rounded());
    rendered.to_string()
}

/// Write reports as JSON lines
pub fn render_json(reports: &[RunReport], writer: &mut dyn Write) -> Result<()> {
    for report in reports {
        serde_json::to_writer(&mut *writer, report)?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Write one colored status line per report, plus optional table previews
fn render_text(reports: &[RunReport], preview: bool, stdout: &mut StandardStream) -> Result<()> {
    for report in reports {
        let color = match report.outcome {
            Outcome::Success => Color::Green,
            Outcome::Failure => Color::Red,
        };
        stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(stdout, "{}", report.pipeline)?;
        stdout.reset()?;
        writeln!(stdout, ": {}", report.message)?;

        if preview {
            if let Some(table) = &report.table {
                writeln!(stdout, "{}", preview_table(table))?;
            }
        }
    }
    Ok(())
}

/// Render reports to stdout in the configured format
pub fn render_to_stdout(reports: &[RunReport], format: OutputFormat, preview: bool) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let choice = if std::io::stdout().is_terminal() {
                ColorChoice::Auto
            } else {
                ColorChoice::Never
            };
            let mut stdout = StandardStream::stdout(choice);
            render_text(reports, preview, &mut stdout)
        }
        OutputFormat::Json => render_json(reports, &mut std::io::stdout()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellValue;

    #[test]
    fn test_preview_contains_cells() {
        let mut table = Table::with_names(["country_code", "age_group_0_14"]).unwrap();
        table
            .add_row(vec!["AT".into(), CellValue::Float(14.4)], 0)
            .unwrap();
        let rendered = preview_table(&table);
        assert!(rendered.contains("country_code"));
        assert!(rendered.contains("14.4"));
    }

    #[test]
    fn test_json_report_omits_empty_fields() {
        let report = RunReport {
            pipeline: "population_table".to_string(),
            outcome: Outcome::Failure,
            message: "failed".to_string(),
            destination: None,
            rows: None,
            columns: None,
            table: None,
        };
        let mut buf = Vec::new();
        render_json(&[report], &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["outcome"], "failure");
        assert!(value.get("rows").is_none());
    }
}
