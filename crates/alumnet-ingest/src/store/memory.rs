//! In-memory alumni store
//!
//! Backs the test suites: behaves like the Postgres store (upsert on id,
//! stable insertion order, limit/offset paging) and can be scripted to fail
//! specific batch or update calls so the continue-on-error paths are
//! exercisable without a database.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{AlumniStore, StoreError, StoredAlumni};
use crate::record::AlumniRecord;

#[derive(Default)]
struct Inner {
    rows: Vec<AlumniRecord>,
    insert_calls: usize,
    failing_insert_calls: HashSet<usize>,
    failing_update_ids: HashSet<String>,
    fetch_offsets: Vec<i64>,
    fail_counts: bool,
}

/// Shared-handle in-memory store; clones observe the same state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the n-th `insert_batch` call (0-indexed) to fail.
    pub async fn fail_insert_call(&self, call: usize) {
        self.inner.lock().await.failing_insert_calls.insert(call);
    }

    /// Script every `set_graduation_year` for this id to fail.
    pub async fn fail_update_for(&self, alumni_id: &str) {
        self.inner
            .lock()
            .await
            .failing_update_ids
            .insert(alumni_id.to_string());
    }

    /// Script the count queries to fail, simulating an unreachable store.
    pub async fn fail_counts(&self) {
        self.inner.lock().await.fail_counts = true;
    }

    /// Records currently in the store, in insertion order.
    pub async fn records(&self) -> Vec<AlumniRecord> {
        self.inner.lock().await.rows.clone()
    }

    /// How many `insert_batch` calls were issued (including failed ones).
    pub async fn insert_calls(&self) -> usize {
        self.inner.lock().await.insert_calls
    }

    /// Offsets of every page fetch issued, in order.
    pub async fn fetch_offsets(&self) -> Vec<i64> {
        self.inner.lock().await.fetch_offsets.clone()
    }
}

#[async_trait]
impl AlumniStore for MemoryStore {
    async fn insert_batch(&self, records: &[AlumniRecord]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let call = inner.insert_calls;
        inner.insert_calls += 1;

        if inner.failing_insert_calls.contains(&call) {
            return Err(StoreError::Rejected(format!(
                "scripted failure for batch call {call}"
            )));
        }

        for record in records {
            match inner
                .rows
                .iter_mut()
                .find(|row| row.alumni_id == record.alumni_id)
            {
                Some(existing) => *existing = record.clone(),
                None => inner.rows.push(record.clone()),
            }
        }
        Ok(())
    }

    async fn count_missing_graduation_year(&self) -> Result<i64, StoreError> {
        let inner = self.inner.lock().await;
        if inner.fail_counts {
            return Err(StoreError::Rejected("scripted count failure".to_string()));
        }
        Ok(inner
            .rows
            .iter()
            .filter(|row| row.graduation_date.is_some() && row.graduation_year.is_none())
            .count() as i64)
    }

    async fn fetch_missing_graduation_year(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StoredAlumni>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.fetch_offsets.push(offset);
        Ok(inner
            .rows
            .iter()
            .filter(|row| row.graduation_date.is_some() && row.graduation_year.is_none())
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|row| StoredAlumni {
                alumni_id: row.alumni_id.clone(),
                graduation_date: row.graduation_date,
            })
            .collect())
    }

    async fn set_graduation_year(&self, alumni_id: &str, year: i32) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.failing_update_ids.contains(alumni_id) {
            return Err(StoreError::Rejected(format!(
                "scripted update failure for {alumni_id}"
            )));
        }
        if let Some(row) = inner
            .rows
            .iter_mut()
            .find(|row| row.alumni_id == alumni_id)
        {
            row.graduation_year = Some(year);
        }
        Ok(())
    }

    async fn count_with_graduation_year(&self) -> Result<i64, StoreError> {
        let inner = self.inner.lock().await;
        if inner.fail_counts {
            return Err(StoreError::Rejected("scripted count failure".to_string()));
        }
        Ok(inner
            .rows
            .iter()
            .filter(|row| row.graduation_year.is_some())
            .count() as i64)
    }
}
