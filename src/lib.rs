//! reportflow - report-table ETL over a blob store
//!
//! Reads raw delimited files, cleans and reshapes them, joins them against
//! lookup tables and writes the processed tables back to storage.

pub mod config;
pub mod error;
pub mod join;
pub mod logging;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod storage;
pub mod transform;

pub use config::Config;
pub use error::{PipelineError, Result};
pub use model::Table;
pub use pipeline::{Orchestrator, Outcome, PipelineName};
