//! Per-token indicator bundle consumed by the signal rules.

use crate::domain::candle::{closes, Candle};
use crate::domain::indicator::atr::calculate_atr;
use crate::domain::indicator::bollinger::{calculate_bollinger, BollingerBands};
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::volatility::calculate_volatility;
use crate::domain::indicator::IndicatorSeries;

/// Every series the strategy rules read, computed once per token and shared
/// read-only by all agents.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub sma20: IndicatorSeries,
    pub sma26: IndicatorSeries,
    pub sma50: IndicatorSeries,
    pub ema9: IndicatorSeries,
    pub ema12: IndicatorSeries,
    pub ema26: IndicatorSeries,
    pub rsi14: IndicatorSeries,
    pub bollinger: IndicatorSeries<BollingerBands>,
    pub volatility14: IndicatorSeries,
    pub atr14: IndicatorSeries,
}

impl IndicatorSet {
    pub fn compute(candles: &[Candle]) -> Self {
        let closes = closes(candles);
        IndicatorSet {
            sma20: calculate_sma(&closes, 20),
            sma26: calculate_sma(&closes, 26),
            sma50: calculate_sma(&closes, 50),
            ema9: calculate_ema(&closes, 9),
            ema12: calculate_ema(&closes, 12),
            ema26: calculate_ema(&closes, 26),
            rsi14: calculate_rsi(&closes, 14),
            bollinger: calculate_bollinger(&closes, 20, 200),
            volatility14: calculate_volatility(&closes, 14),
            atr14: calculate_atr(candles, 14),
        }
    }

    /// Number of entries (equal to the candle count).
    pub fn len(&self) -> usize {
        self.sma20.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sma20.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_candles;

    fn ramp(n: usize) -> Vec<Candle> {
        let prices: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        make_candles(&prices)
    }

    #[test]
    fn series_are_index_aligned() {
        let set = IndicatorSet::compute(&ramp(60));
        assert_eq!(set.len(), 60);
        assert_eq!(set.sma50.len(), 60);
        assert_eq!(set.bollinger.len(), 60);
        assert_eq!(set.atr14.len(), 60);
    }

    #[test]
    fn warmup_boundaries() {
        let set = IndicatorSet::compute(&ramp(60));
        assert_eq!(set.sma20.first_valid(), Some(19));
        assert_eq!(set.sma26.first_valid(), Some(25));
        assert_eq!(set.sma50.first_valid(), Some(49));
        assert_eq!(set.ema9.first_valid(), Some(8));
        assert_eq!(set.ema26.first_valid(), Some(25));
        assert_eq!(set.rsi14.first_valid(), Some(14));
        assert_eq!(set.bollinger.first_valid(), Some(19));
        assert_eq!(set.volatility14.first_valid(), Some(14));
        assert_eq!(set.atr14.first_valid(), Some(14));
    }

    #[test]
    fn short_history_has_no_long_average() {
        let set = IndicatorSet::compute(&ramp(30));
        assert!(set.sma50.values.iter().all(Option::is_none));
        assert!(set.sma20.at(29).is_some());
    }

    #[test]
    fn recomputation_is_identical() {
        let candles = ramp(40);
        assert_eq!(IndicatorSet::compute(&candles), IndicatorSet::compute(&candles));
    }

    #[test]
    fn prefix_slice_gives_same_values() {
        // no look-ahead: values up to i depend only on candles up to i
        let candles = ramp(60);
        let full = IndicatorSet::compute(&candles);
        let prefix = IndicatorSet::compute(&candles[..35]);
        for i in 0..35 {
            assert_eq!(full.sma20.at(i), prefix.sma20.at(i));
            assert_eq!(full.ema12.at(i), prefix.ema12.at(i));
            assert_eq!(full.rsi14.at(i), prefix.rsi14.at(i));
            assert_eq!(full.volatility14.at(i), prefix.volatility14.at(i));
        }
    }
}
