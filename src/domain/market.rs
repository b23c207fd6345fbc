//! Shared read-only market data.
//!
//! Candles and their indicator series are computed once per token and then
//! shared by every agent's simulation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::candle::Candle;
use crate::domain::indicator::IndicatorSet;

/// One token's candles with their precomputed indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenData {
    pub token: String,
    pub candles: Vec<Candle>,
    pub indicators: IndicatorSet,
}

impl TokenData {
    /// Sorts `candles` ascending by timestamp before computing indicators.
    pub fn new(token: &str, mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.timestamp);
        let indicators = IndicatorSet::compute(&candles);
        TokenData {
            token: token.to_string(),
            candles,
            indicators,
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Close at `index`, or the last close once the series has ended.
    pub fn close_at(&self, index: usize) -> f64 {
        let last = self.candles.len().saturating_sub(1);
        self.candles.get(index.min(last)).map_or(0.0, |c| c.close)
    }

    pub fn last_close(&self) -> f64 {
        self.candles.last().map_or(0.0, |c| c.close)
    }
}

/// Every token the arena can trade, keyed by symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketData {
    tokens: BTreeMap<String, TokenData>,
}

impl MarketData {
    /// Build from raw per-token series. Empty series are dropped.
    pub fn new(series: impl IntoIterator<Item = (String, Vec<Candle>)>) -> Self {
        let mut tokens = BTreeMap::new();
        for (token, candles) in series {
            if candles.is_empty() {
                warn!(token = %token, "skipping token with no candles");
                continue;
            }
            debug!(token = %token, candles = candles.len(), "computing indicators");
            let data = TokenData::new(&token, candles);
            tokens.insert(token, data);
        }
        MarketData { tokens }
    }

    pub fn get(&self, token: &str) -> Option<&TokenData> {
        self.tokens.get(token)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &TokenData> {
        self.tokens.values()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Summary of each token's price action over the loaded period.
    pub fn context(&self) -> Vec<TokenContext> {
        self.tokens.values().filter_map(TokenContext::from_data).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenContext {
    pub token: String,
    pub first_close: f64,
    pub last_close: f64,
    pub period_return_pct: f64,
    pub candles: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl TokenContext {
    fn from_data(data: &TokenData) -> Option<Self> {
        let first = data.candles.first()?;
        let last = data.candles.last()?;
        let period_return_pct = if first.close != 0.0 {
            (last.close - first.close) / first.close * 100.0
        } else {
            0.0
        };
        Some(TokenContext {
            token: data.token.clone(),
            first_close: first.close,
            last_close: last.close,
            period_return_pct,
            candles: data.len(),
            start_date: first.date,
            end_date: last.date,
        })
    }
}
