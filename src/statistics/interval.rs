//! Per-interval aggregation: one [`StatMetrics`] each for ask and bid prices,
//! plus running volume totals. A thin struct that owns two metrics engines
//! and exposes a single `add_quote`/`finish` pair, so a reducer never
//! touches the heaps directly.

use crate::statistics::StatMetrics;
use crate::types::{IntervalStatistics, Quote, TimeInterval};

/// Accumulates ask/bid price statistics and volume totals for one time
/// bucket. Owned exclusively by a single reducer for its lifetime.
#[derive(Debug, Clone)]
pub struct Statistics {
    interval: TimeInterval,
    ask: StatMetrics,
    bid: StatMetrics,
    ask_volume: f64,
    bid_volume: f64,
}

impl Statistics {
    /// A fresh accumulator for the given bucket, with no quotes observed.
    pub fn new(interval: TimeInterval) -> Self {
        Statistics {
            interval,
            ask: StatMetrics::new(),
            bid: StatMetrics::new(),
            ask_volume: 0.0,
            bid_volume: 0.0,
        }
    }

    /// Fold one quote into the running ask/bid statistics and volumes.
    pub fn add_quote(&mut self, quote: &Quote) {
        self.ask.insert(quote.ask);
        self.bid.insert(quote.bid);
        self.ask_volume += quote.ask_vol;
        self.bid_volume += quote.bid_vol;
    }

    /// Number of quotes folded into this bucket so far.
    pub fn count(&self) -> u64 {
        self.ask.count()
    }

    /// Finalize this bucket into its output record. Called once, after the
    /// owning reducer has drained its channel to a sentinel.
    pub fn finish(&self) -> IntervalStatistics {
        if self.count() == 0 {
            return IntervalStatistics::empty(self.interval);
        }
        IntervalStatistics {
            interval: self.interval,
            ask_max: self.ask.max(),
            ask_min: self.ask.min(),
            ask_avg: self.ask.mean(),
            ask_median: self.ask.median(),
            ask_volume: self.ask_volume,
            bid_max: self.bid.max(),
            bid_min: self.bid.min(),
            bid_avg: self.bid.mean(),
            bid_median: self.bid.median(),
            bid_volume: self.bid_volume,
        }
    }
}
