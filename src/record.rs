//! Deserialization of the MongoDB-extended-JSON quote records that make up
//! the input file: every numeric field is wrapped as `{"$numberLong": ".."}`
//! or `{"$numberInt": ".."}` instead of a bare JSON number.

use crate::types::Quote;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NumberLong {
    #[serde(rename = "$numberLong")]
    value: String,
}

#[derive(Debug, Deserialize)]
struct NumberInt {
    #[serde(rename = "$numberInt")]
    value: String,
}

/// Just the timestamp, used by the preprocessor's boundary scan.
#[derive(Debug, Deserialize)]
pub struct RawTimestamp {
    time: NumberLong,
}

impl RawTimestamp {
    pub fn time_ns(&self) -> Result<u64, std::num::ParseIntError> {
        self.time.value.parse()
    }
}

/// One full line of the input file, before scaling.
#[derive(Debug, Deserialize)]
pub struct RawQuote {
    time: NumberLong,
    bid: NumberInt,
    ask: NumberInt,
    #[serde(rename = "bidVolume")]
    bid_volume: NumberInt,
    #[serde(rename = "askVolume")]
    ask_volume: NumberInt,
}

impl RawQuote {
    /// Parse one NDJSON line into a raw record.
    pub fn parse_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Convert into a [`Quote`], scaling bid/ask by 1e-6 and volumes by
    /// 1e-3 as the wire format specifies.
    pub fn into_quote(self) -> Result<Quote, std::num::ParseIntError> {
        let time_ns = self.time.value.parse::<u64>()?;
        let bid = self.bid.value.parse::<i64>()? as f64 / 1_000_000.0;
        let ask = self.ask.value.parse::<i64>()? as f64 / 1_000_000.0;
        let bid_vol = self.bid_volume.value.parse::<i64>()? as f64 / 1_000.0;
        let ask_vol = self.ask_volume.value.parse::<i64>()? as f64 / 1_000.0;
        Ok(Quote {
            time_ns,
            bid,
            ask,
            bid_vol,
            ask_vol,
        })
    }
}
