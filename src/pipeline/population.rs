//! `population_table`: age-group shares per country, wide format

use tracing::info;

use super::{Orchestrator, COUNTRY_LOOKUP, RAW_POPULATION};
use crate::error::Result;
use crate::join::{inner_join, JoinKey};
use crate::model::Table;
use crate::transform::{normalize_percentages, pivot, rename_age_columns};

/// Reference year whose percentages are reported
pub const REPORT_YEAR: &str = "2019";

/// Output columns, in order
pub const POPULATION_COLUMNS: [&str; 10] = [
    "country",
    "country_code_2_digit",
    "country_code_3_digit",
    "population",
    "age_group_0_14",
    "age_group_15_24",
    "age_group_25_49",
    "age_group_50_64",
    "age_group_65_79",
    "age_group_80_max",
];

/// Reshape raw age-group percentages to one row per country and attach the
/// country lookup. Countries missing from the lookup are dropped.
pub fn population_table(population: Table, countries: &Table) -> Result<Table> {
    let long = normalize_percentages(population, REPORT_YEAR)?;
    let value_column = format!("percentage_{}", REPORT_YEAR);

    let mut wide = pivot(&long, "country_code", "age_group", &value_column)?;
    rename_age_columns(&mut wide, "country_code")?;

    let mut joined = inner_join(
        &wide,
        countries,
        &JoinKey::new("country_code", "country_code_2_digit"),
    )?;
    joined.select(&POPULATION_COLUMNS)?;
    Ok(joined)
}

/// Fetch the population sources and build the table
pub fn build_population_table(orchestrator: &Orchestrator<'_>) -> Result<Table> {
    let population = orchestrator.fetch_table(RAW_POPULATION)?;
    let countries = orchestrator.fetch_table(COUNTRY_LOOKUP)?;

    let table = population_table(population, &countries)?;
    info!(rows = table.row_count(), "built population table");
    Ok(table)
}
