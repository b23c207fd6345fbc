//! Daily OHLCV candle representation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of price history for a token. Sequences are ordered ascending by
/// `timestamp` and never mutated once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    /// Period open time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Quote-asset volume.
    pub volume: f64,
}

impl Candle {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    /// Fractional change from `prev_close` to this close.
    pub fn return_since(&self, prev_close: f64) -> f64 {
        (self.close - prev_close) / prev_close
    }

    /// Open, high, low and close are all equal.
    pub fn is_degenerate(&self) -> bool {
        self.open == self.high && self.high == self.low && self.low == self.close
    }
}

/// Closing prices of a candle slice.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}
