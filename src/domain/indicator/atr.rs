//! Average True Range as a simple mean.
//!
//! ATR(n)[i] = mean of the n true ranges ending at i, each measured against
//! the previous close. Warmup: first n entries are unavailable.

use crate::domain::candle::Candle;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_atr(candles: &[Candle], period: usize) -> IndicatorSeries {
    let values = (0..candles.len())
        .map(|i| {
            if period == 0 || i < period {
                return None;
            }
            let sum: f64 = (i + 1 - period..=i)
                .map(|j| candles[j].true_range(candles[j - 1].close))
                .sum();
            Some(sum / period as f64)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Atr(period),
        values,
    }
}
