//! Backfill pipeline: repair the derived graduation year in place
//!
//! Earlier imports wrote `graduation_date` without the derived
//! `graduation_year` column. This run pages through the affected records,
//! recomputes the year, and patches them one by one. Count and page fetches
//! hitting the store are fatal; a failed per-record update is recorded and
//! the run continues.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::normalize::derive_year;
use crate::pipeline::PipelineError;
use crate::report::{BackfillReport, FailedUpdate};
use crate::store::AlumniStore;

/// Drives one backfill run against the store.
pub struct BackfillPipeline<S> {
    store: S,
    page_size: i64,
}

impl<S: AlumniStore> BackfillPipeline<S> {
    pub fn new(store: S, page_size: i64) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    /// Run the repair. The offset advances by the page size after every
    /// fetch regardless of per-record outcomes, so the run terminates once
    /// the offset reaches the initial candidate count and no page is read
    /// twice.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> Result<BackfillReport, PipelineError> {
        let candidates = self.store.count_missing_graduation_year().await?;
        if candidates == 0 {
            info!("no records need a graduation year; nothing to do");
            return Ok(BackfillReport {
                candidates: 0,
                pages_fetched: 0,
                records_updated: 0,
                failures: Vec::new(),
                verified_with_year: self.store.count_with_graduation_year().await?,
            });
        }
        info!(candidates, page_size = self.page_size, "starting backfill");

        let pb = page_progress_bar(candidates as u64);
        let mut offset = 0;
        let mut pages_fetched = 0;
        let mut records_updated = 0;
        let mut failures = Vec::new();

        while offset < candidates {
            let page = self
                .store
                .fetch_missing_graduation_year(self.page_size, offset)
                .await?;
            pages_fetched += 1;

            for record in &page {
                match derive_year(record.graduation_date) {
                    Some(year) => {
                        match self.store.set_graduation_year(&record.alumni_id, year).await {
                            Ok(()) => records_updated += 1,
                            Err(err) => {
                                warn!(alumni_id = %record.alumni_id, error = %err, "update failed");
                                failures.push(FailedUpdate {
                                    alumni_id: record.alumni_id.clone(),
                                    error: err.to_string(),
                                });
                            }
                        }
                    }
                    // The predicate requires a date, so this only fires if
                    // the store hands back a row it should not have.
                    None => failures.push(FailedUpdate {
                        alumni_id: record.alumni_id.clone(),
                        error: "record has no graduation date".to_string(),
                    }),
                }
                pb.inc(1);
            }

            offset += self.page_size;
        }

        pb.finish_and_clear();

        let verified_with_year = self.store.count_with_graduation_year().await?;
        let report = BackfillReport {
            candidates,
            pages_fetched,
            records_updated,
            failures,
            verified_with_year,
        };
        info!(
            updated = report.records_updated,
            failed = report.failures.len(),
            verified = report.verified_with_year,
            "backfill finished"
        );
        Ok(report)
    }
}

fn page_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{msg} [{wide_bar:.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message("Backfilling years");
    pb
}
