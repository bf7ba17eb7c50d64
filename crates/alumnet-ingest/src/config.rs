//! Import run configuration
//!
//! One `ImportConfig` parameterizes the whole pipeline: which institution
//! owns the records, the fixed identifier segments, and the batch size.
//! The two historical imports (SPACO and St. Patrick's) used to be separate
//! scripts differing only in these values; they are now named profiles over
//! the same pipeline.

use alumnet_common::{AlumnetError, Result};
use serde::{Deserialize, Serialize};

/// Default number of records per bulk-insert call.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default number of records per backfill page.
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Immutable parameters for one import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Store identifier of the owning institution (assigned at import time)
    pub institution_id: i64,

    /// Fixed institution code segment of the alumni identifier
    pub institution_code: String,

    /// Jurisdiction (state) code segment
    pub jurisdiction_code: String,

    /// Cohort year segment
    pub cohort_year: i32,

    /// Level code segment (e.g. "HI" for higher school)
    pub level_code: String,

    /// Records per bulk-insert call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl ImportConfig {
    /// Profile for the SPACO registry export.
    pub fn spaco(institution_id: i64) -> Self {
        Self {
            institution_id,
            institution_code: "SPACO".to_string(),
            jurisdiction_code: "OY".to_string(),
            cohort_year: 1962,
            level_code: "HI".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Profile for the St. Patrick's registry export.
    pub fn st_patricks(institution_id: i64) -> Self {
        Self {
            institution_id,
            institution_code: "STPAT".to_string(),
            jurisdiction_code: "OY".to_string(),
            cohort_year: 1958,
            level_code: "HI".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Override the cohort year
    pub fn with_cohort_year(mut self, year: i32) -> Self {
        self.cohort_year = year;
        self
    }

    /// Override the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Override the level code
    pub fn with_level_code(mut self, level_code: impl Into<String>) -> Self {
        self.level_code = level_code.into();
        self
    }
}

/// Read the store connection string from the environment.
///
/// Missing credentials are a fatal configuration error: without them the
/// run cannot reach the store at all.
pub fn database_url() -> Result<String> {
    std::env::var("DATABASE_URL").map_err(|_| {
        AlumnetError::Config(
            "DATABASE_URL is not set; export it or add it to your .env file".to_string(),
        )
    })
}
