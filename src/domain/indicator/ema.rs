//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the SMA of the first full window, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). Warmup: first (n-1) entries are
//! unavailable.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub fn calculate_ema(closes: &[f64], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(period),
            values: vec![None; closes.len()],
        };
    }

    let mut values = Vec::with_capacity(closes.len());
    let k = 2.0 / (period as f64 + 1.0);
    let mut prev: Option<f64> = None;

    for (i, &close) in closes.iter().enumerate() {
        if i + 1 < period {
            values.push(None);
            continue;
        }
        let ema = match prev {
            None => closes[i + 1 - period..=i].iter().sum::<f64>() / period as f64,
            Some(p) => close * k + p * (1.0 - k),
        };
        prev = Some(ema);
        values.push(Some(ema));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_warmup() {
        let series = calculate_ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        assert!(series.at(0).is_none());
        assert!(series.at(1).is_none());
        assert!(series.at(2).is_some());
        assert!(series.at(4).is_some());
    }

    #[test]
    fn ema_seed_is_sma() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 3);
        assert!((series.at(2).unwrap() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = calculate_ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        let k = 2.0 / 4.0;
        let ema_3 = 40.0 * k + 20.0 * (1.0 - k);
        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);
        assert!((series.at(3).unwrap() - ema_3).abs() < f64::EPSILON);
        assert!((series.at(4).unwrap() - ema_4).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_equal_prices() {
        let series = calculate_ema(&[100.0; 6], 3);
        for i in 2..6 {
            assert!((series.at(i).unwrap() - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_period_1_tracks_close() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 1);
        assert_eq!(series.values, vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 3).is_empty());
    }
}
