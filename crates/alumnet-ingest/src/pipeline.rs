//! Ingestion pipeline: source file to batched store writes
//!
//! One run is strictly sequential: load, split, parse, batch, submit,
//! report. Only the file load and a total inability to construct the store
//! client are fatal; per-line and per-batch failures are accumulated into
//! the report and the run continues.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ImportConfig;
use crate::parser;
use crate::record::AlumniRecord;
use crate::report::{BatchOutcome, ImportReport, RowOutcome};
use crate::store::{AlumniStore, StoreError};

/// Fatal pipeline errors; everything recoverable lands in the report instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read source file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drives one import run over one source file.
pub struct IngestionPipeline<S> {
    store: S,
    config: ImportConfig,
}

impl<S: AlumniStore> IngestionPipeline<S> {
    pub fn new(store: S, config: ImportConfig) -> Self {
        Self { store, config }
    }

    /// Run the full import. Returns the operator report; the only `Err`
    /// cases are an unreadable source file or an unreachable store.
    #[tracing::instrument(skip(self, path), fields(institution = %self.config.institution_code))]
    pub async fn run(&self, path: &Path) -> Result<ImportReport, PipelineError> {
        let text = tokio::fs::read_to_string(path).await?;
        info!(path = %path.display(), "loaded source file");

        let (records, row_outcomes) = self.parse_lines(&text);
        let batch_outcomes = self.submit_batches(&records).await;

        let report = ImportReport::from_outcomes(&row_outcomes, &batch_outcomes);
        info!(
            prepared = report.records_prepared,
            skipped = report.rows_skipped.len(),
            committed = report.records_committed,
            "import run finished"
        );
        Ok(report)
    }

    /// Parse every data line, accumulating records and per-row outcomes.
    /// The first line is the header; blank lines are ignored.
    fn parse_lines(&self, text: &str) -> (Vec<AlumniRecord>, Vec<RowOutcome>) {
        let mut records = Vec::new();
        let mut outcomes = Vec::new();

        for (idx, line) in text.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = idx + 1;
            match parser::parse_line(line, &self.config) {
                Ok(record) => {
                    records.push(record);
                    outcomes.push(RowOutcome::Prepared { line: line_no });
                }
                Err(reason) => {
                    warn!(line = line_no, %reason, "skipping source line");
                    outcomes.push(RowOutcome::Skipped {
                        line: line_no,
                        reason,
                    });
                }
            }
        }

        (records, outcomes)
    }

    /// Submit fixed-size contiguous batches, one bulk insert each. A failed
    /// batch is recorded and the next one is still attempted; there is no
    /// retry and no rollback of earlier batches.
    async fn submit_batches(&self, records: &[AlumniRecord]) -> Vec<BatchOutcome> {
        let batches: Vec<&[AlumniRecord]> = records.chunks(self.config.batch_size).collect();
        let pb = batch_progress_bar(batches.len() as u64);
        let mut outcomes = Vec::with_capacity(batches.len());

        for (index, batch) in batches.into_iter().enumerate() {
            let error = match self.store.insert_batch(batch).await {
                Ok(()) => {
                    info!(batch = index, records = batch.len(), "batch committed");
                    None
                }
                Err(err) => {
                    warn!(batch = index, records = batch.len(), error = %err, "batch failed");
                    Some(err.to_string())
                }
            };
            outcomes.push(BatchOutcome {
                index,
                size: batch.len(),
                error,
            });
            pb.inc(1);
        }

        pb.finish_and_clear();
        outcomes
    }
}

fn batch_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{msg} [{wide_bar:.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message("Submitting batches");
    pb
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::io::Write;

    fn data_line(seq: &str, adm: &str, name: &str, grad: &str) -> String {
        let mut cells = vec![""; parser::MIN_COLUMNS];
        cells[parser::columns::SEQUENCE_ID] = seq;
        cells[parser::columns::ADMISSION_NUMBER] = adm;
        cells[parser::columns::FULL_NAME] = name;
        cells[parser::columns::GRADUATION_DATE] = grad;
        cells.join("\t")
    }

    fn write_source(lines: &[String]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SN\tADM NO\tADM DATE\tFULL NAME\t...").unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[tokio::test]
    async fn test_run_prepares_and_commits() {
        let lines = vec![
            data_line("1", "23", "Adewale Ogunleye", "1-Mar-1990"),
            data_line("2", "24", "Chinwe Okafor", "Missing"),
        ];
        let file = write_source(&lines);

        let store = MemoryStore::new();
        let pipeline = IngestionPipeline::new(store.clone(), ImportConfig::spaco(1));
        let report = pipeline.run(file.path()).await.unwrap();

        assert_eq!(report.lines_read, 2);
        assert_eq!(report.records_prepared, 2);
        assert_eq!(report.records_committed, 2);
        assert_eq!(report.batches_submitted, 1);
        assert!(report.batches_failed.is_empty());

        let records = store.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].alumni_id, "SPACO/OY/1962/023/HI");
    }

    #[tokio::test]
    async fn test_run_skips_blank_lines_and_header() {
        let lines = vec![
            String::new(),
            data_line("1", "23", "Adewale Ogunleye", ""),
            "   ".to_string(),
        ];
        let file = write_source(&lines);

        let store = MemoryStore::new();
        let pipeline = IngestionPipeline::new(store.clone(), ImportConfig::spaco(1));
        let report = pipeline.run(file.path()).await.unwrap();

        assert_eq!(report.lines_read, 1);
        assert_eq!(report.records_prepared, 1);
    }

    #[tokio::test]
    async fn test_run_batches_ceil_and_isolates_failures() {
        // 5 records, batch size 2 -> ceil(5/2) = 3 submissions.
        let lines: Vec<String> = (1..=5)
            .map(|i| data_line(&i.to_string(), &i.to_string(), &format!("Person {i}"), ""))
            .collect();
        let file = write_source(&lines);

        let store = MemoryStore::new();
        store.fail_insert_call(1).await;
        let config = ImportConfig::spaco(1).with_batch_size(2);
        let pipeline = IngestionPipeline::new(store.clone(), config);
        let report = pipeline.run(file.path()).await.unwrap();

        assert_eq!(report.batches_submitted, 3);
        assert_eq!(store.insert_calls().await, 3);
        assert_eq!(report.batches_failed.len(), 1);
        assert_eq!(report.batches_failed[0].batch, 1);
        // Batches 0 (2 records) and 2 (1 record) landed; batch 1 did not.
        assert_eq!(report.records_committed, 3);
        assert_eq!(store.records().await.len(), 3);
    }

    #[tokio::test]
    async fn test_run_is_idempotent_on_identifiers() {
        let lines = vec![data_line("1", "23", "Adewale Ogunleye", "1-Mar-1990")];
        let file = write_source(&lines);

        let store = MemoryStore::new();
        let pipeline = IngestionPipeline::new(store.clone(), ImportConfig::spaco(1));
        pipeline.run(file.path()).await.unwrap();
        pipeline.run(file.path()).await.unwrap();

        // Second run upserts onto the same identifier.
        let records = store.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].alumni_id, "SPACO/OY/1962/023/HI");
    }

    #[tokio::test]
    async fn test_run_missing_file_is_fatal() {
        let store = MemoryStore::new();
        let pipeline = IngestionPipeline::new(store, ImportConfig::spaco(1));
        let result = pipeline.run(Path::new("/nonexistent/alumni.txt")).await;
        assert!(matches!(result, Err(PipelineError::Io(_))));
    }
}
