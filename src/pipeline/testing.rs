//! `testing_table`: weekly testing figures with week bounds and ISO-3 codes

use tracing::info;

use super::{Orchestrator, COUNTRY_LOOKUP, DIM_DATE, RAW_TESTING};
use crate::error::Result;
use crate::join::{inner_join, JoinKey};
use crate::model::Table;
use crate::transform::derive_weeks;

/// Join testing rows with their week bounds and country codes
pub fn testing_table(dates: &Table, mut countries: Table, testing: &Table) -> Result<Table> {
    let weeks = derive_weeks(dates)?;
    countries.select(&["country_code_3_digit", "country_code_2_digit"])?;

    let with_weeks = inner_join(testing, &weeks, &JoinKey::on("year_week"))?;
    let mut joined = inner_join(
        &with_weeks,
        &countries,
        &JoinKey::new("country_code", "country_code_2_digit"),
    )?;
    joined.drop_column("country_code")?;
    Ok(joined)
}

/// Fetch the testing sources and build the table
pub fn build_testing_table(orchestrator: &Orchestrator<'_>) -> Result<Table> {
    let dates = orchestrator.fetch_table(DIM_DATE)?;
    let countries = orchestrator.fetch_table(COUNTRY_LOOKUP)?;
    let testing = orchestrator.fetch_table(RAW_TESTING)?;

    let table = testing_table(&dates, countries, &testing)?;
    info!(rows = table.row_count(), "built testing table");
    Ok(table)
}
