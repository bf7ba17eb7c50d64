//! Run outcomes and operator reports
//!
//! Each unit of work (source row, submitted batch, backfilled record) leaves
//! an explicit outcome; the reports are pure functions of those accumulated
//! outcomes. Operators compare `records_committed` against
//! `records_prepared` to find the residual gap and re-run against it —
//! nothing here retries automatically.

use serde::Serialize;
use std::fmt;

use crate::parser::SkipReason;

/// Outcome of parsing one source line
#[derive(Debug, Clone)]
pub enum RowOutcome {
    /// Line produced a record (1-based line number in the source file)
    Prepared { line: usize },
    /// Line was skipped with a reason
    Skipped { line: usize, reason: SkipReason },
}

/// Outcome of one bulk-insert call
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Batch index, 0-based
    pub index: usize,
    /// Records in the batch
    pub size: usize,
    /// Store error message, if the call failed
    pub error: Option<String>,
}

/// One skipped source row, for the operator summary
#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: String,
}

/// One failed batch submission
#[derive(Debug, Clone, Serialize)]
pub struct FailedBatch {
    pub batch: usize,
    pub records: usize,
    pub error: String,
}

/// Summary of one ingestion run
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    /// Data lines read (header and blank lines excluded)
    pub lines_read: usize,
    pub records_prepared: usize,
    pub rows_skipped: Vec<SkippedRow>,
    pub batches_submitted: usize,
    pub batches_failed: Vec<FailedBatch>,
    /// Records in batches the store accepted
    pub records_committed: usize,
}

impl ImportReport {
    /// Build the report from the accumulated outcomes.
    pub fn from_outcomes(rows: &[RowOutcome], batches: &[BatchOutcome]) -> Self {
        let records_prepared = rows
            .iter()
            .filter(|outcome| matches!(outcome, RowOutcome::Prepared { .. }))
            .count();
        let rows_skipped = rows
            .iter()
            .filter_map(|outcome| match outcome {
                RowOutcome::Skipped { line, reason } => Some(SkippedRow {
                    line: *line,
                    reason: reason.to_string(),
                }),
                RowOutcome::Prepared { .. } => None,
            })
            .collect();
        let batches_failed: Vec<FailedBatch> = batches
            .iter()
            .filter_map(|batch| {
                batch.error.as_ref().map(|error| FailedBatch {
                    batch: batch.index,
                    records: batch.size,
                    error: error.clone(),
                })
            })
            .collect();
        let records_committed = batches
            .iter()
            .filter(|batch| batch.error.is_none())
            .map(|batch| batch.size)
            .sum();

        Self {
            lines_read: rows.len(),
            records_prepared,
            rows_skipped,
            batches_submitted: batches.len(),
            batches_failed,
            records_committed,
        }
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "import: {} lines read, {} prepared, {} skipped, {}/{} committed",
            self.lines_read,
            self.records_prepared,
            self.rows_skipped.len(),
            self.records_committed,
            self.records_prepared,
        )?;
        for skipped in &self.rows_skipped {
            writeln!(f, "  skipped line {}: {}", skipped.line, skipped.reason)?;
        }
        for failed in &self.batches_failed {
            writeln!(
                f,
                "  batch {} failed ({} records): {}",
                failed.batch, failed.records, failed.error
            )?;
        }
        Ok(())
    }
}

/// One record the backfill could not repair
#[derive(Debug, Clone, Serialize)]
pub struct FailedUpdate {
    pub alumni_id: String,
    pub error: String,
}

/// Summary of one backfill run
#[derive(Debug, Clone, Serialize)]
pub struct BackfillReport {
    /// Records matching the repair predicate at the start of the run
    pub candidates: i64,
    pub pages_fetched: usize,
    pub records_updated: usize,
    pub failures: Vec<FailedUpdate>,
    /// Post-run count of records whose derived year is populated
    pub verified_with_year: i64,
}

impl fmt::Display for BackfillReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "backfill: {} candidates, {} pages, {} updated, {} failed, {} verified with year",
            self.candidates,
            self.pages_fetched,
            self.records_updated,
            self.failures.len(),
            self.verified_with_year,
        )?;
        for failure in &self.failures {
            writeln!(f, "  failed {}: {}", failure.alumni_id, failure.error)?;
        }
        Ok(())
    }
}
