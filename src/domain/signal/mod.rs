//! Signal engine.
//!
//! Strategy rules are pure functions from a [`SignalContext`] to a
//! [`SignalOutput`], dispatched by strategy name through the
//! [`registry`]. The context only exposes history up to and including the
//! current index, so a rule cannot look ahead.
//!
//! # Evaluation
//!
//! - Market-neutral strategies always answer HOLD; they earn through
//!   [`yield_model`] instead.
//! - Unknown strategy names answer HOLD with zero confidence.
//! - An agent's final signal blends its primary and secondary strategies,
//!   then the trend filter may suppress a BUY.

pub mod averages;
pub mod oscillators;
pub mod registry;
pub mod returns;
pub mod schedule;
pub mod volume;
pub mod yield_model;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::agent::AgentProfile;
use crate::domain::candle::Candle;
use crate::domain::catalog::Catalog;
use crate::domain::indicator::{BollingerBands, IndicatorSeries, IndicatorSet};

/// Agreement boost applied with the secondary strategy's confidence.
const AGREEMENT_BOOST: f64 = 0.3;
/// Damping applied when the secondary strategy disagrees.
const DISAGREEMENT_DAMPING: f64 = 0.6;
/// Blended confidence below this becomes HOLD.
const MIN_CONFIDENCE: f64 = 0.2;
/// Lookback for the long-average slope used by the trend filter.
const TREND_LOOKBACK: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalOutput {
    pub signal: Signal,
    /// Always within [0, 1].
    pub confidence: f64,
}

impl SignalOutput {
    pub fn new(signal: Signal, confidence: f64) -> Self {
        SignalOutput {
            signal,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn hold() -> Self {
        SignalOutput {
            signal: Signal::Hold,
            confidence: 0.0,
        }
    }

    pub fn buy(confidence: f64) -> Self {
        Self::new(Signal::Buy, confidence)
    }

    pub fn sell(confidence: f64) -> Self {
        Self::new(Signal::Sell, confidence)
    }
}

/// Read-only view of one token's history at one simulated day.
#[derive(Debug, Clone, Copy)]
pub struct SignalContext<'a> {
    candles: &'a [Candle],
    indicators: &'a IndicatorSet,
    index: usize,
    pub agent: &'a AgentProfile,
}

impl<'a> SignalContext<'a> {
    /// `index` must be a valid candle index.
    pub fn new(
        candles: &'a [Candle],
        indicators: &'a IndicatorSet,
        index: usize,
        agent: &'a AgentProfile,
    ) -> Self {
        debug_assert!(index < candles.len());
        SignalContext {
            candles,
            indicators,
            index,
            agent,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn candle(&self) -> &'a Candle {
        &self.candles[self.index]
    }

    pub fn close(&self) -> f64 {
        self.candles[self.index].close
    }

    pub fn volume(&self) -> f64 {
        self.candles[self.index].volume
    }

    /// Candle `back` days before the current one.
    pub fn candle_back(&self, back: usize) -> Option<&'a Candle> {
        self.index.checked_sub(back).map(|i| &self.candles[i])
    }

    /// Fractional close change over the last `days` days.
    pub fn return_over(&self, days: usize) -> Option<f64> {
        let past = self.candle_back(days)?;
        Some(self.candle().return_since(past.close))
    }

    /// The `days` candles strictly before the current one.
    fn window_before(&self, days: usize) -> Option<&'a [Candle]> {
        let start = self.index.checked_sub(days)?;
        Some(&self.candles[start..self.index])
    }

    /// Mean volume of the `days` candles before the current one.
    pub fn avg_volume_before(&self, days: usize) -> Option<f64> {
        let window = self.window_before(days)?;
        Some(window.iter().map(|c| c.volume).sum::<f64>() / days as f64)
    }

    /// Highest high of the `days` candles before the current one.
    pub fn high_before(&self, days: usize) -> Option<f64> {
        let window = self.window_before(days)?;
        window.iter().map(|c| c.high).reduce(f64::max)
    }

    /// Lowest low of the `days` candles before the current one.
    pub fn low_before(&self, days: usize) -> Option<f64> {
        let window = self.window_before(days)?;
        window.iter().map(|c| c.low).reduce(f64::min)
    }

    /// Value of `series` `back` days before the current index.
    pub fn back(&self, series: &IndicatorSeries, back: usize) -> Option<f64> {
        series.at(self.index.checked_sub(back)?)
    }

    pub fn indicators(&self) -> &'a IndicatorSet {
        self.indicators
    }

    pub fn sma20(&self) -> Option<f64> {
        self.indicators.sma20.at(self.index)
    }

    pub fn sma26(&self) -> Option<f64> {
        self.indicators.sma26.at(self.index)
    }

    pub fn sma50(&self) -> Option<f64> {
        self.indicators.sma50.at(self.index)
    }

    pub fn ema9(&self) -> Option<f64> {
        self.indicators.ema9.at(self.index)
    }

    pub fn ema12(&self) -> Option<f64> {
        self.indicators.ema12.at(self.index)
    }

    pub fn ema26(&self) -> Option<f64> {
        self.indicators.ema26.at(self.index)
    }

    pub fn rsi(&self) -> Option<f64> {
        self.indicators.rsi14.at(self.index)
    }

    pub fn volatility(&self) -> Option<f64> {
        self.indicators.volatility14.at(self.index)
    }

    pub fn bands(&self) -> Option<BollingerBands> {
        self.indicators.bollinger.at(self.index)
    }

    pub fn bands_back(&self, back: usize) -> Option<BollingerBands> {
        self.indicators.bollinger.at(self.index.checked_sub(back)?)
    }
}

/// Combine primary and secondary outputs.
///
/// Agreement on a direction boosts confidence, a conflicting non-HOLD
/// secondary damps it, and weak results collapse to HOLD.
pub fn blend(primary: SignalOutput, secondary: SignalOutput) -> SignalOutput {
    let mut confidence = primary.confidence;
    if secondary.signal == primary.signal && secondary.confidence > 0.0 {
        confidence = (confidence + secondary.confidence * AGREEMENT_BOOST).min(1.0);
    } else if secondary.signal != Signal::Hold && secondary.signal != primary.signal {
        confidence *= DISAGREEMENT_DAMPING;
    }
    let signal = if confidence < MIN_CONFIDENCE {
        Signal::Hold
    } else {
        primary.signal
    };
    SignalOutput::new(signal, confidence)
}

/// Long average at `index` is at least its value `TREND_LOOKBACK` days
/// earlier. Permissive when either value is unavailable.
pub fn is_uptrend(indicators: &IndicatorSet, index: usize) -> bool {
    let current = indicators.sma50.at(index);
    let earlier = indicators.sma50.at(index.saturating_sub(TREND_LOOKBACK));
    match (current, earlier) {
        (Some(now), Some(then)) => now >= then,
        _ => true,
    }
}

/// Dispatches strategy names to rules under one catalog's neutral and
/// trend-filtered sets.
#[derive(Debug, Clone, Copy)]
pub struct SignalEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> SignalEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        SignalEngine { catalog }
    }

    /// Signal of a single strategy.
    pub fn evaluate(&self, strategy: &str, ctx: &SignalContext<'_>) -> SignalOutput {
        if self.catalog.is_market_neutral(strategy) {
            return SignalOutput::hold();
        }
        match registry::lookup(strategy) {
            Some(rule) => rule(ctx),
            None => SignalOutput::hold(),
        }
    }

    /// Final signal of an agent: blended, then trend-filtered.
    pub fn decide(&self, agent: &AgentProfile, ctx: &SignalContext<'_>) -> SignalOutput {
        let primary = self.evaluate(&agent.primary_strategy, ctx);
        let secondary = self.evaluate(&agent.secondary_strategy, ctx);
        let blended = blend(primary, secondary);

        if blended.signal == Signal::Buy
            && self.catalog.is_trend_filtered(&agent.primary_strategy)
            && !is_uptrend(ctx.indicators(), ctx.index())
        {
            return SignalOutput::new(Signal::Hold, blended.confidence);
        }
        blended
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::domain::agent::{create_agent, AgentProfile};
    use crate::domain::candle::Candle;
    use crate::domain::catalog::Catalog;
    use crate::domain::indicator::IndicatorSet;

    pub fn candle(i: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
        Candle {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
            timestamp: 1_704_067_200_000 + i as i64 * 86_400_000,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Flat candles from closes with constant volume.
    pub fn from_closes(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| candle(i, c, c, c, c, 1000.0))
            .collect()
    }

    pub fn profile() -> AgentProfile {
        create_agent(0, &Catalog::crypto()).profile
    }

    /// Candles, indicators and an agent profile held together for a test.
    pub struct Fixture {
        pub candles: Vec<Candle>,
        pub indicators: IndicatorSet,
        pub profile: AgentProfile,
    }

    impl Fixture {
        pub fn new(candles: Vec<Candle>) -> Self {
            let indicators = IndicatorSet::compute(&candles);
            Fixture {
                candles,
                indicators,
                profile: profile(),
            }
        }

        pub fn closes(closes: &[f64]) -> Self {
            Self::new(from_closes(closes))
        }

        pub fn ctx(&self, index: usize) -> super::SignalContext<'_> {
            super::SignalContext::new(&self.candles, &self.indicators, index, &self.profile)
        }

        pub fn last(&self) -> super::SignalContext<'_> {
            self.ctx(self.candles.len() - 1)
        }
    }
}
