//! Simple Moving Average.
//!
//! SMA(n)[i] = mean of the n closes ending at i. Warmup: first (n-1) entries
//! are unavailable.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_sma(closes: &[f64], period: usize) -> IndicatorSeries {
    let values = if period == 0 {
        vec![None; closes.len()]
    } else {
        (0..closes.len())
            .map(|i| {
                if i + 1 < period {
                    None
                } else {
                    let window = &closes[i + 1 - period..=i];
                    Some(window.iter().sum::<f64>() / period as f64)
                }
            })
            .collect()
    };

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_warmup() {
        let series = calculate_sma(&[10.0, 20.0, 30.0, 40.0], 3);
        assert_eq!(series.at(0), None);
        assert_eq!(series.at(1), None);
        assert!(series.at(2).is_some());
        assert!(series.at(3).is_some());
    }

    #[test]
    fn sma_is_trailing_mean() {
        let series = calculate_sma(&[10.0, 20.0, 30.0, 40.0], 3);
        assert!((series.at(2).unwrap() - 20.0).abs() < f64::EPSILON);
        assert!((series.at(3).unwrap() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sma_period_1_is_identity() {
        let series = calculate_sma(&[3.0, 7.0], 1);
        assert_eq!(series.values, vec![Some(3.0), Some(7.0)]);
    }

    #[test]
    fn sma_short_input_all_unavailable() {
        let series = calculate_sma(&[1.0, 2.0], 5);
        assert!(series.values.iter().all(Option::is_none));
    }

    #[test]
    fn sma_period_0() {
        let series = calculate_sma(&[1.0, 2.0], 0);
        assert_eq!(series.values, vec![None, None]);
    }

    #[test]
    fn sma_indicator_type() {
        assert_eq!(calculate_sma(&[], 20).indicator_type, IndicatorType::Sma(20));
    }
}
