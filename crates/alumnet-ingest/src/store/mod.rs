//! Store seam for the ingestion and backfill pipelines
//!
//! The remote store is a black box offering bulk insert, filtered paged
//! reads, and point updates. Pipelines take any [`AlumniStore`] by value,
//! constructed by the caller — one client per process run, released when the
//! run finishes.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::record::AlumniRecord;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgAlumniStore;

/// Errors surfaced by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store rejected a unit of work (constraint violation, scripted
    /// test failure). Recoverable at the pipeline level.
    #[error("store rejected operation: {0}")]
    Rejected(String),
}

/// Read model for the backfill pipeline: just enough of a stored record to
/// recompute the derived year.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredAlumni {
    pub alumni_id: String,
    pub graduation_date: Option<NaiveDate>,
}

/// Operations the pipelines need from the remote store
#[async_trait]
pub trait AlumniStore: Send + Sync {
    /// Write one batch of records in a single call. Identifier conflicts
    /// upsert rather than fail, so re-imports are operator-safe.
    async fn insert_batch(&self, records: &[AlumniRecord]) -> Result<(), StoreError>;

    /// Count records with a graduation date but no derived year.
    async fn count_missing_graduation_year(&self) -> Result<i64, StoreError>;

    /// Fetch one page of records matching the backfill predicate, in a
    /// stable order (insertion timestamp ascending, id ascending).
    async fn fetch_missing_graduation_year(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StoredAlumni>, StoreError>;

    /// Set the derived graduation year on one record.
    async fn set_graduation_year(&self, alumni_id: &str, year: i32) -> Result<(), StoreError>;

    /// Count records whose derived year is populated, for post-run
    /// verification.
    async fn count_with_graduation_year(&self) -> Result<i64, StoreError>;
}
