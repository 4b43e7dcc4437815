//! Scans the input file to determine the time-bucket grid and partitions it
//! into record-aligned byte ranges, one per mapper: a forward scan for the
//! first line, a backward byte-by-byte scan for the last, then a
//! chunk-and-snap-to-newline pass for the byte ranges.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

use crate::error::IngestError;
use crate::record::RawTimestamp;
use crate::types::{FileSegment, IntervalMetadata, PreprocessedData, TimeInterval};

/// Scans and partitions one input file.
pub struct Preprocessor {
    path: String,
    worker_count: usize,
    bucket_length_ns: u64,
    file_size: u64,
}

impl Preprocessor {
    /// Validate configuration and stat the file. Fails fast on bad
    /// arguments or an empty file, before any worker is started.
    pub fn new(path: impl Into<String>, worker_count: usize, bucket_length_ns: u64) -> Result<Self, IngestError> {
        let path = path.into();
        if path.is_empty() {
            return Err(IngestError::InvalidArgument("empty path for preprocessing".into()));
        }
        if worker_count == 0 {
            return Err(IngestError::InvalidArgument("worker count must be positive".into()));
        }
        if bucket_length_ns == 0 {
            return Err(IngestError::InvalidArgument("bucket length must be positive".into()));
        }

        let file_size = std::fs::metadata(&path)
            .map_err(|e| IngestError::UnreadableFile(e.to_string()))?
            .len();
        if file_size == 0 {
            return Err(IngestError::EmptyFile);
        }

        Ok(Preprocessor {
            path,
            worker_count,
            bucket_length_ns,
            file_size,
        })
    }

    /// Scan and partition the file, producing the full grid of segments,
    /// intervals, and metadata the rest of the pipeline runs on.
    pub fn preprocess(&self) -> Result<PreprocessedData, IngestError> {
        let mut file = File::open(&self.path).map_err(|e| IngestError::UnreadableFile(e.to_string()))?;

        let (intervals, metadata) = self.scan_time_intervals(&mut file)?;
        let segments = self.partition_segments(&mut file)?;

        Ok(PreprocessedData {
            segments,
            intervals,
            metadata,
        })
    }

    fn scan_time_intervals(&self, file: &mut File) -> Result<(Vec<TimeInterval>, IntervalMetadata), IngestError> {
        file.seek(SeekFrom::Start(0))
            .map_err(|e| IngestError::UnreadableFile(e.to_string()))?;

        let mut first_line = String::new();
        BufReader::new(&*file)
            .read_line(&mut first_line)
            .map_err(|e| IngestError::MalformedHeader(e.to_string()))?;
        let global_start_ns = parse_timestamp(&first_line).map_err(IngestError::MalformedHeader)?;

        let last_line = read_last_line(file, self.file_size).map_err(IngestError::MalformedTrailer)?;
        let global_end_ns = parse_timestamp(&last_line).map_err(IngestError::MalformedTrailer)?;

        let total = global_end_ns.saturating_sub(global_start_ns);
        let mut count = total / self.bucket_length_ns;
        if total % self.bucket_length_ns != 0 {
            count += 1;
        }
        if count == 0 {
            count = 1;
        }

        let mut intervals = Vec::with_capacity(count as usize);
        for i in 0..count {
            let start_ns = global_start_ns + i * self.bucket_length_ns;
            let end_ns = start_ns + self.bucket_length_ns;
            intervals.push(TimeInterval { start_ns, end_ns });
        }

        let metadata = IntervalMetadata {
            count,
            global_start_ns,
            global_end_ns,
            length_ns: self.bucket_length_ns,
        };

        Ok((intervals, metadata))
    }

    fn partition_segments(&self, file: &mut File) -> Result<Vec<FileSegment>, IngestError> {
        let chunk = self.file_size / self.worker_count as u64;
        if chunk == 0 {
            return Err(IngestError::TooManyWorkers {
                file_size: self.file_size,
                worker_count: self.worker_count,
            });
        }

        let mut segments = Vec::with_capacity(self.worker_count);
        for i in 0..self.worker_count {
            let tentative_start = i as u64 * chunk;
            let tentative_end = if i == self.worker_count - 1 {
                self.file_size
            } else {
                tentative_start + chunk
            };

            let start_offset = if tentative_start > 0 {
                advance_to_newline(file, tentative_start, self.file_size)
                    .map_err(|e| IngestError::UnreadableFile(e.to_string()))?
            } else {
                0
            };
            let end_offset = if tentative_end < self.file_size {
                advance_to_newline(file, tentative_end, self.file_size)
                    .map_err(|e| IngestError::UnreadableFile(e.to_string()))?
            } else {
                self.file_size
            };

            segments.push(FileSegment { start_offset, end_offset });
        }

        Ok(segments)
    }
}

fn parse_timestamp(line: &str) -> Result<u64, String> {
    let trimmed = line.trim();
    let raw: RawTimestamp = serde_json::from_str(trimmed).map_err(|e| e.to_string())?;
    raw.time_ns().map_err(|e| e.to_string())
}

/// Seek backwards from EOF one byte at a time until a newline is found,
/// then return the line that follows it (the last complete record).
fn read_last_line(file: &mut File, file_size: u64) -> Result<String, String> {
    if file_size < 2 {
        file.seek(SeekFrom::Start(0)).map_err(|e| e.to_string())?;
        let mut line = String::new();
        BufReader::new(&*file).read_line(&mut line).map_err(|e| e.to_string())?;
        return Ok(line);
    }

    let mut pos = file_size - 1;
    let mut byte = [0u8; 1];
    while pos > 0 {
        pos -= 1;
        file.seek(SeekFrom::Start(pos)).map_err(|e| e.to_string())?;
        file.read_exact(&mut byte).map_err(|e| e.to_string())?;
        if byte[0] == b'\n' {
            pos += 1;
            break;
        }
    }

    file.seek(SeekFrom::Start(pos)).map_err(|e| e.to_string())?;
    let mut line = String::new();
    BufReader::new(&*file).read_line(&mut line).map_err(|e| e.to_string())?;
    Ok(line)
}

/// Starting at `offset`, read forward byte by byte until a newline is
/// consumed or EOF is reached, returning the resulting position.
fn advance_to_newline(file: &mut File, offset: u64, file_size: u64) -> Result<u64, std::io::Error> {
    file.seek(SeekFrom::Start(offset))?;
    let mut pos = offset;
    let mut byte = [0u8; 1];
    while pos < file_size {
        file.read_exact(&mut byte)?;
        pos += 1;
        if byte[0] == b'\n' {
            break;
        }
    }
    Ok(pos)
}
