//! Bollinger Bands.
//!
//! - Middle: SMA over n closes
//! - Upper / Lower: middle ± multiplier × population StdDev
//! - Bandwidth: 2 × multiplier × StdDev / middle
//!
//! Warmup: first (n-1) entries are unavailable.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
    pub bandwidth: f64,
}

pub fn calculate_bollinger(
    closes: &[f64],
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries<BollingerBands> {
    let mult = stddev_mult_x100 as f64 / 100.0;

    let values = (0..closes.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                return None;
            }
            let window = &closes[i + 1 - period..=i];
            let middle = window.iter().sum::<f64>() / period as f64;
            let variance = window
                .iter()
                .map(|c| {
                    let diff = c - middle;
                    diff * diff
                })
                .sum::<f64>()
                / period as f64;
            let stddev = variance.sqrt();
            Some(BollingerBands {
                middle,
                upper: middle + mult * stddev,
                lower: middle - mult * stddev,
                bandwidth: stddev * 2.0 * mult / middle,
            })
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}
