//! Rolling volatility as a coefficient of variation.
//!
//! VOL(n)[i] = population StdDev / mean over the n closes ending at i.
//! Warmup: first n entries are unavailable.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_volatility(closes: &[f64], period: usize) -> IndicatorSeries {
    let values = (0..closes.len())
        .map(|i| {
            if period == 0 || i < period {
                return None;
            }
            let window = &closes[i + 1 - period..=i];
            let mean = window.iter().sum::<f64>() / period as f64;
            let variance = window
                .iter()
                .map(|c| {
                    let diff = c - mean;
                    diff * diff
                })
                .sum::<f64>()
                / period as f64;
            Some(variance.sqrt() / mean)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Volatility(period),
        values,
    }
}
