//! Online statistics engine: dual-heap streaming median plus per-interval
//! aggregation of ask/bid metrics and volumes.

pub mod interval;
pub mod metrics;

pub use interval::Statistics;
pub use metrics::StatMetrics;
