//! quotestat - parallel map-reduce aggregation of time-bucketed market
//! quote statistics.
//!
//! Reads a newline-delimited JSON file of timestamped bid/ask quotes and
//! produces min/max/mean/median/volume statistics for both sides of the
//! book, bucketed into fixed-width time intervals. The pipeline is a
//! classic map-reduce: a [`preprocessor`] partitions the input file into
//! record-aligned byte ranges and computes the bucket grid, [`mapper`]
//! workers parse and route records onto per-bucket [`channel`]s, and
//! [`reducer`] workers drain those channels into [`statistics`], all
//! coordinated by the [`orchestrator`].
//!
//! # Example
//!
//! ```ignore
//! use quotestat::config::JobConfig;
//! use quotestat::preprocessor::Preprocessor;
//! use quotestat::orchestrator;
//!
//! let config = JobConfig::default();
//! let pre = Preprocessor::new("quotes.ndjson", config.worker_count, config.bucket_length_ns)?;
//! let data = pre.preprocess()?;
//! let results = orchestrator::run("quotes.ndjson", &data, &config)?;
//! ```

pub mod channel;
pub mod cli;
pub mod config;
pub mod error;
pub mod mapper;
pub mod orchestrator;
pub mod output;
pub mod preprocessor;
pub mod record;
pub mod reducer;
pub mod statistics;
pub mod types;

pub use cli::Cli;
pub use config::JobConfig;
pub use error::IngestError;
pub use preprocessor::Preprocessor;
pub use types::{FileSegment, IntervalStatistics, Quote, TimeInterval};
