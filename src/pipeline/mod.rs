//! Pipeline orchestration: fetch, transform, join, store

mod population;
mod testing;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::model::Table;
use crate::output::{to_csv_bytes, RunReport};
use crate::parser::{decode_text, parse, Delimiter};
use crate::storage::{BlobStore, ContainerStatus, ObjectRef};
use crate::transform::filter_degenerate;

pub use population::{build_population_table, POPULATION_COLUMNS};
pub use testing::build_testing_table;

pub const DIM_DATE: ObjectRef<'static> = ObjectRef::new("utilities", "dim_date.csv");
pub const COUNTRY_LOOKUP: ObjectRef<'static> = ObjectRef::new("utilities", "country_lookup.csv");
pub const RAW_TESTING: ObjectRef<'static> = ObjectRef::new("raw", "testing/testing.csv");
pub const RAW_POPULATION: ObjectRef<'static> =
    ObjectRef::new("raw", "population_by_age/population_by_age.tsv");
pub const TESTING_OUTPUT: ObjectRef<'static> = ObjectRef::new("processed", "testing/testing.csv");
pub const POPULATION_OUTPUT: ObjectRef<'static> =
    ObjectRef::new("processed", "population/population.csv");

pub const SUCCESS_MESSAGE: &str = "executed successfully";
pub const FAILURE_MESSAGE: &str = "did not execute successfully";

/// The two report tables this crate builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineName {
    Testing,
    Population,
}

impl PipelineName {
    pub const ALL: [PipelineName; 2] = [PipelineName::Testing, PipelineName::Population];

    /// Request route name
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineName::Testing => "testing_table",
            PipelineName::Population => "population_table",
        }
    }

    /// Where the finished table is written
    pub fn destination(self) -> ObjectRef<'static> {
        match self {
            PipelineName::Testing => TESTING_OUTPUT,
            PipelineName::Population => POPULATION_OUTPUT,
        }
    }
}

impl std::fmt::Display for PipelineName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PipelineName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "testing_table" => Ok(PipelineName::Testing),
            "population_table" => Ok(PipelineName::Population),
            _ => Err(format!("Unknown pipeline: {}", s)),
        }
    }
}

/// Externally visible result of one request: no detail beyond success or failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Success => SUCCESS_MESSAGE,
            Outcome::Failure => FAILURE_MESSAGE,
        }
    }
}

/// Runs pipelines against a shared, read-only storage handle
pub struct Orchestrator<'a> {
    store: &'a dyn BlobStore,
    config: &'a Config,
}

impl<'a> Orchestrator<'a> {
    pub fn new(store: &'a dyn BlobStore, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// Fetch, decode, parse and sanitize one source object
    pub fn fetch_table(&self, source: ObjectRef<'_>) -> Result<Table> {
        let bytes = self.store.fetch(source.container, source.object)?;
        let text = decode_text(source.object, &bytes)?;
        let table = parse(&text, Delimiter::from_object_name(source.object))?;
        if table.column_count() == 0 {
            return Err(PipelineError::EmptyTable(source.to_string()));
        }
        let table = filter_degenerate(table, self.config.min_distinct_values);
        info!(source = %source, rows = table.row_count(), "loaded source table");
        Ok(table)
    }

    /// Serialize `table` as CSV and write it, creating the container if needed
    pub fn persist(&self, table: &Table, destination: ObjectRef<'_>) -> Result<()> {
        match self.store.ensure_container(destination.container)? {
            ContainerStatus::Created => {
                info!(container = destination.container, "created container")
            }
            ContainerStatus::AlreadyExists => {
                warn!(container = destination.container, "container already exists")
            }
        }

        let bytes = to_csv_bytes(table)?;
        self.store
            .store(destination.container, destination.object, &bytes, true)?;
        info!(
            destination = %destination,
            rows = table.row_count(),
            "uploaded result table"
        );
        Ok(())
    }

    /// Build and store one pipeline's table, keeping the detailed error
    pub fn execute(&self, name: PipelineName) -> Result<Table> {
        let table = match name {
            PipelineName::Testing => build_testing_table(self)?,
            PipelineName::Population => build_population_table(self)?,
        };
        self.persist(&table, name.destination())?;
        Ok(table)
    }

    /// Request boundary: run a pipeline and collapse any error into `Failure`
    pub fn run(&self, name: PipelineName) -> RunReport {
        info!(pipeline = %name, "request received");
        match self.execute(name) {
            Ok(table) => RunReport {
                pipeline: name.to_string(),
                outcome: Outcome::Success,
                message: Outcome::Success.message().to_string(),
                destination: Some(name.destination().to_string()),
                rows: Some(table.row_count()),
                columns: Some(table.column_count()),
                table: Some(table),
            },
            Err(e) => {
                error!(pipeline = %name, error = %e, "pipeline failed");
                RunReport {
                    pipeline: name.to_string(),
                    outcome: Outcome::Failure,
                    message: Outcome::Failure.message().to_string(),
                    destination: None,
                    rows: None,
                    columns: None,
                    table: None,
                }
            }
        }
    }

    /// Run both pipelines concurrently; they share nothing but the store
    pub fn run_all(&self) -> Vec<RunReport> {
        let (testing, population) = rayon::join(
            || self.run(PipelineName::Testing),
            || self.run(PipelineName::Population),
        );
        vec![testing, population]
    }
}
