//! Worker that drains one bucket's channel into its finalized statistics.
//!
//! Validates `id` against the channel and result-slot ranges up front, then
//! spin-polls the channel until the sentinel arrives and writes the
//! finalized statistics into this reducer's exclusive result slot.

use std::sync::{Arc, Mutex};

use crossbeam_utils::sync::WaitGroup;

use crate::channel::QuoteChannel;
use crate::error::IngestError;
use crate::statistics::Statistics;
use crate::types::{IntervalStatistics, TimeInterval};

/// Owns one bucket's [`Statistics`] accumulator and writes the result into
/// its disjoint slot in the shared result vector.
pub struct Reducer {
    id: usize,
    channels: Arc<Vec<QuoteChannel>>,
    results: Arc<Vec<Mutex<Option<IntervalStatistics>>>>,
    interval: TimeInterval,
}

impl Reducer {
    /// Validate `id` against the channel and result-slot ranges.
    pub fn new(
        id: usize,
        interval: TimeInterval,
        channels: Arc<Vec<QuoteChannel>>,
        results: Arc<Vec<Mutex<Option<IntervalStatistics>>>>,
    ) -> Result<Self, IngestError> {
        if channels.is_empty() {
            return Err(IngestError::InvalidArgument("reducing channels are empty".into()));
        }
        if results.is_empty() {
            return Err(IngestError::InvalidArgument("aggregated statistics is empty".into()));
        }
        if id >= channels.len() {
            return Err(IngestError::InvalidArgument("reducer id is out of channels range".into()));
        }
        if id >= results.len() {
            return Err(IngestError::InvalidArgument(
                "reducer id is out of aggregated statistics range".into(),
            ));
        }
        if interval.end_ns < interval.start_ns {
            return Err(IngestError::InvalidArgument(
                "time interval end is before its start".into(),
            ));
        }

        Ok(Reducer {
            id,
            channels,
            results,
            interval,
        })
    }

    /// Drain this reducer's channel to the sentinel, then write the
    /// finalized statistics into its result slot. `wg` is dropped on every
    /// exit path, decrementing the orchestrator's reducers-remaining
    /// barrier.
    pub fn run(self, _wg: WaitGroup) {
        let mut stats = Statistics::new(self.interval);

        loop {
            match self.channels[self.id].try_dequeue() {
                Some(Some(quote)) => stats.add_quote(&quote),
                Some(None) => break,
                None => continue,
            }
        }

        let mut slot = self.results[self.id].lock().expect("result slot mutex poisoned");
        *slot = Some(stats.finish());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval() -> TimeInterval {
        TimeInterval { start_ns: 0, end_ns: 10 }
    }

    fn quote(time_ns: u64) -> crate::types::Quote {
        crate::types::Quote {
            time_ns,
            bid: 1.0,
            ask: 2.0,
            bid_vol: 1.0,
            ask_vol: 1.0,
        }
    }

    #[test]
    fn test_rejects_out_of_range_id() {
        let channels = Arc::new(vec![QuoteChannel::new(4)]);
        let results = Arc::new(vec![Mutex::new(None)]);
        let err = Reducer::new(5, interval(), channels, results).unwrap_err();
        assert!(matches!(err, IngestError::InvalidArgument(_)));
    }

    #[test]
    fn test_rejects_inverted_interval() {
        let channels = Arc::new(vec![QuoteChannel::new(4)]);
        let results = Arc::new(vec![Mutex::new(None)]);
        let inverted = TimeInterval { start_ns: 10, end_ns: 5 };
        let err = Reducer::new(0, inverted, channels, results).unwrap_err();
        assert!(matches!(err, IngestError::InvalidArgument(_)));
    }

    #[test]
    fn test_drains_channel_until_sentinel_and_writes_result() {
        let channels = Arc::new(vec![QuoteChannel::new(8)]);
        let results = Arc::new(vec![Mutex::new(None)]);

        channels[0].enqueue(Some(quote(1)));
        channels[0].enqueue(Some(quote(2)));
        channels[0].enqueue(None);

        let reducer = Reducer::new(0, interval(), Arc::clone(&channels), Arc::clone(&results)).unwrap();
        let wg = WaitGroup::new();
        reducer.run(wg.clone());
        drop(wg);

        let slot = results[0].lock().unwrap();
        let stats = slot.as_ref().expect("reducer must write its slot");
        assert_eq!(stats.ask_max, 2.0);
        assert_eq!(stats.ask_min, 2.0);
        assert_eq!(stats.bid_volume, 2.0);
    }

    #[test]
    fn test_empty_stream_produces_empty_statistics() {
        let channels = Arc::new(vec![QuoteChannel::new(4)]);
        let results = Arc::new(vec![Mutex::new(None)]);
        channels[0].enqueue(None);

        let reducer = Reducer::new(0, interval(), Arc::clone(&channels), Arc::clone(&results)).unwrap();
        let wg = WaitGroup::new();
        reducer.run(wg.clone());
        drop(wg);

        let slot = results[0].lock().unwrap();
        assert!(slot.as_ref().unwrap().ask_max.is_nan());
    }
}
