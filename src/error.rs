//! Error types for the ingestion pipeline: small, hand-rolled types with
//! manual `Display`/`Error` impls rather than a derive macro, propagated
//! through `anyhow` at the call sites that don't need to match on a variant.

use std::fmt;

/// Errors raised while validating configuration or preprocessing the input
/// file. These are all fatal: they abort the job before any worker starts.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestError {
    /// Empty path, zero worker count, zero bucket length, or similar bad
    /// configuration caught before touching the filesystem.
    InvalidArgument(String),
    /// The input file could not be opened or `stat`-ed.
    UnreadableFile(String),
    /// The input file exists but contains no bytes.
    EmptyFile,
    /// `file_size / worker_count == 0`; the caller must reduce the worker
    /// count or the file is too small to partition.
    TooManyWorkers { file_size: u64, worker_count: usize },
    /// The first record in the file could not be parsed.
    MalformedHeader(String),
    /// The last record in the file could not be parsed.
    MalformedTrailer(String),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            IngestError::UnreadableFile(msg) => write!(f, "could not read input file: {msg}"),
            IngestError::EmptyFile => write!(f, "input file is empty"),
            IngestError::TooManyWorkers {
                file_size,
                worker_count,
            } => write!(
                f,
                "chunk size must be positive, file size: {file_size} threads: {worker_count}, please reduce threads value"
            ),
            IngestError::MalformedHeader(msg) => {
                write!(f, "could not parse first record of the file: {msg}")
            }
            IngestError::MalformedTrailer(msg) => {
                write!(f, "could not parse last record of the file: {msg}")
            }
        }
    }
}

impl std::error::Error for IngestError {}
