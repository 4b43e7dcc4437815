//! Worker that parses one byte range of the input file and routes each
//! record to the channel for its time bucket. Inputs are validated in the
//! constructor; running reads lines until the file position passes the
//! segment's end, logging and skipping anything that fails to parse or
//! falls outside the bucket grid.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::sync::Arc;

use crossbeam_utils::sync::WaitGroup;

use crate::channel::QuoteChannel;
use crate::error::IngestError;
use crate::record::RawQuote;
use crate::types::{FileSegment, IntervalMetadata};

/// Parses and routes one [`FileSegment`] of the input file.
pub struct Mapper {
    path: String,
    segment: FileSegment,
    metadata: IntervalMetadata,
    channels: Arc<Vec<QuoteChannel>>,
}

impl Mapper {
    /// Validate the inputs this mapper will run against.
    pub fn new(
        path: impl Into<String>,
        segment: FileSegment,
        metadata: IntervalMetadata,
        channels: Arc<Vec<QuoteChannel>>,
    ) -> Result<Self, IngestError> {
        let path = path.into();
        if path.is_empty() {
            return Err(IngestError::InvalidArgument("empty path to mapping file".into()));
        }
        if segment.end_offset < segment.start_offset {
            return Err(IngestError::InvalidArgument(
                "segment end offset is less than start offset".into(),
            ));
        }
        if channels.is_empty() {
            return Err(IngestError::InvalidArgument("mapping channels are empty".into()));
        }
        if metadata.length_ns == 0 {
            return Err(IngestError::InvalidArgument("mapper interval length must be positive".into()));
        }

        Ok(Mapper {
            path,
            segment,
            metadata,
            channels,
        })
    }

    /// Run this mapper to completion. `wg` is dropped on every exit path
    /// (including the early return on an unopenable file), which is what
    /// decrements the orchestrator's mappers-remaining barrier.
    pub fn run(self, _wg: WaitGroup) {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                tracing::error!(path = %self.path, error = %e, "could not open mapping file");
                return;
            }
        };

        let mut reader = BufReader::new(file);
        if let Err(e) = reader.seek(SeekFrom::Start(self.segment.start_offset)) {
            tracing::error!(path = %self.path, error = %e, "could not seek to segment start");
            return;
        }

        let mut pos = self.segment.start_offset;
        loop {
            let mut line = String::new();
            let bytes_read = match reader.read_line(&mut line) {
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(error = %e, "error reading line in mapping segment");
                    break;
                }
            };
            if bytes_read == 0 {
                break;
            }
            pos += bytes_read as u64;
            if pos > self.segment.end_offset {
                break;
            }

            self.process_line(line.trim_end());
        }
    }

    fn process_line(&self, line: &str) {
        let raw = match RawQuote::parse_line(line) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, line, "could not parse record");
                return;
            }
        };
        let quote = match raw.into_quote() {
            Ok(q) => q,
            Err(e) => {
                tracing::warn!(error = %e, line, "could not scale record fields");
                return;
            }
        };

        let idx = (quote.time_ns - self.metadata.global_start_ns) / self.metadata.length_ns;
        if idx >= self.metadata.count {
            tracing::warn!(
                idx,
                time_ns = quote.time_ns,
                length_ns = self.metadata.length_ns,
                "invalid channel index"
            );
            return;
        }

        self.channels[idx as usize].enqueue(Some(quote));
    }
}
