//! Column metadata

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name (from header), case-sensitive
    pub name: String,
}

impl Column {
    /// Create a new column with a name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Fail on the first repeated column name
pub fn ensure_unique(columns: &[Column]) -> Result<()> {
    let mut seen = FxHashSet::default();
    for col in columns {
        if !seen.insert(col.name.as_str()) {
            return Err(PipelineError::DuplicateColumn(col.name.clone()));
        }
    }
    Ok(())
}
