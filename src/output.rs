//! Formats finalized interval statistics as the newline-delimited JSON
//! records printed to standard output, with the `HH:MM:SS - HH:MM:SS`
//! local-time interval formatting.

use std::io::{self, Write};

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::types::{IntervalStatistics, TimeInterval};

#[derive(Serialize)]
struct Sides {
    ask: f64,
    bid: f64,
}

#[derive(Serialize)]
struct OutputRecord {
    interval: String,
    #[serde(rename = "maxVal")]
    max_val: Sides,
    #[serde(rename = "minVal")]
    min_val: Sides,
    average: Sides,
    median: Sides,
    volume: Sides,
}

/// Render one interval's statistics as a single JSON line (no trailing
/// newline).
pub fn format_output_line(stats: &IntervalStatistics) -> Result<String, serde_json::Error> {
    let record = OutputRecord {
        interval: format_interval(stats.interval),
        max_val: Sides { ask: stats.ask_max, bid: stats.bid_max },
        min_val: Sides { ask: stats.ask_min, bid: stats.bid_min },
        average: Sides { ask: stats.ask_avg, bid: stats.bid_avg },
        median: Sides { ask: stats.ask_median, bid: stats.bid_median },
        volume: Sides { ask: stats.ask_volume, bid: stats.bid_volume },
    };
    serde_json::to_string(&record)
}

/// Write every interval's statistics, one JSON object per line, in
/// ascending interval order.
pub fn write_results<W: Write>(writer: &mut W, results: &[IntervalStatistics]) -> io::Result<()> {
    for stats in results {
        let line = format_output_line(stats).map_err(io::Error::other)?;
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

fn format_interval(interval: TimeInterval) -> String {
    format!(
        "{} - {}",
        format_local_hms(interval.start_ns),
        format_local_hms(interval.end_ns)
    )
}

fn format_local_hms(ns: u64) -> String {
    let seconds = (ns / 1_000_000_000) as i64;
    Local
        .timestamp_opt(seconds, 0)
        .single()
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "00:00:00".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimeInterval;

    fn sample_stats() -> IntervalStatistics {
        IntervalStatistics {
            interval: TimeInterval { start_ns: 0, end_ns: 1_800_000_000_000 },
            ask_max: 6.0,
            ask_min: 1.0,
            ask_avg: 3.5,
            ask_median: 3.5,
            ask_volume: 21.0,
            bid_max: 6.0,
            bid_min: 1.0,
            bid_avg: 3.5,
            bid_median: 3.5,
            bid_volume: 21.0,
        }
    }

    #[test]
    fn test_format_output_line_has_expected_shape() {
        let line = format_output_line(&sample_stats()).unwrap();
        assert!(line.contains("\"maxVal\":{\"ask\":6.0,\"bid\":6.0}"));
        assert!(line.contains("\"minVal\":{\"ask\":1.0,\"bid\":1.0}"));
        assert!(line.contains("\"average\":{\"ask\":3.5,\"bid\":3.5}"));
        assert!(line.contains("\"median\":{\"ask\":3.5,\"bid\":3.5}"));
        assert!(line.contains("\"volume\":{\"ask\":21.0,\"bid\":21.0}"));
    }

    #[test]
    fn test_write_results_emits_one_line_per_interval() {
        let mut buf = Vec::new();
        write_results(&mut buf, &[sample_stats(), sample_stats()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_interval_formatting_is_hh_mm_ss_range() {
        let formatted = format_interval(TimeInterval { start_ns: 0, end_ns: 1_800_000_000_000 });
        assert!(formatted.contains(" - "));
        assert_eq!(formatted.split(" - ").count(), 2);
    }
}
