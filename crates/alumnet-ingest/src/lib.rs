//! Alumnet Ingest Library
//!
//! Bulk ingestion and repair of alumni records from legacy school exports.
//!
//! The import path takes a tab-delimited registry export, normalizes each
//! row into an [`record::AlumniRecord`], and writes the result to the store
//! in fixed-size batches. The backfill path repairs the derived graduation
//! year on records that were ingested before the column existed.
//!
//! # Example
//!
//! ```no_run
//! use alumnet_ingest::config::ImportConfig;
//! use alumnet_ingest::pipeline::IngestionPipeline;
//! use alumnet_ingest::store::memory::MemoryStore;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = MemoryStore::new();
//!     let pipeline = IngestionPipeline::new(store, ImportConfig::spaco(1));
//!     let report = pipeline.run(Path::new("./data/spaco_alumni.txt")).await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod alumni_id;
pub mod backfill;
pub mod config;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod store;
