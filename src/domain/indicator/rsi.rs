//! Relative Strength Index over a simple trailing window.
//!
//! For each i >= n: average gain and average loss of the n close-to-close
//! changes ending at i, RSI = 100 - 100/(1 + gain/loss). A window with no
//! losses saturates at 100. Warmup: first n entries are unavailable.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_rsi(closes: &[f64], period: usize) -> IndicatorSeries {
    let values = (0..closes.len())
        .map(|i| {
            if period == 0 || i < period {
                return None;
            }
            let mut gains = 0.0;
            let mut losses = 0.0;
            for j in i + 1 - period..=i {
                let diff = closes[j] - closes[j - 1];
                if diff > 0.0 {
                    gains += diff;
                } else {
                    losses -= diff;
                }
            }
            let avg_gain = gains / period as f64;
            let avg_loss = losses / period as f64;
            if avg_loss == 0.0 {
                Some(100.0)
            } else {
                Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
