//! Token universe: parsing token lists and loading their price history.
//!
//! Tokens with no data or too little history are skipped with a warning.
//! Malformed data and unreadable files abort the load, as does a universe
//! where nothing usable remains.

use std::collections::HashSet;
use std::io::ErrorKind;

use tracing::{info, warn};

use crate::domain::error::ArenaError;
use crate::domain::market::MarketData;
use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in token list")]
    EmptyToken,

    #[error("duplicate token: {0}")]
    DuplicateToken(String),
}

/// Parse a comma-separated token list, uppercased and deduplicated.
pub fn parse_tokens(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut tokens = Vec::new();
    let mut seen = HashSet::new();

    for raw in input.split(',') {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let token = trimmed.to_uppercase();
        if !seen.insert(token.clone()) {
            return Err(UniverseError::DuplicateToken(token));
        }
        tokens.push(token);
    }

    Ok(tokens)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedToken {
    pub token: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NoData,
    InsufficientCandles { candles: usize },
}

#[derive(Debug)]
pub struct LoadedMarket {
    pub market: MarketData,
    pub skipped: Vec<SkippedToken>,
}

/// Fetch `tokens` through `data_port`, keeping those with at least
/// `min_candles` candles.
pub fn load_market(
    data_port: &dyn DataPort,
    tokens: &[String],
    min_candles: usize,
) -> Result<LoadedMarket, ArenaError> {
    let mut series = Vec::new();
    let mut skipped = Vec::new();

    for token in tokens {
        let candles = match data_port.fetch_candles(token) {
            Ok(candles) if !candles.is_empty() => candles,
            Ok(_) => {
                warn!(token = %token, "skipping token with no data");
                skipped.push(SkippedToken {
                    token: token.clone(),
                    reason: SkipReason::NoData,
                });
                continue;
            }
            Err(ArenaError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                warn!(token = %token, error = %e, "skipping token without a data file");
                skipped.push(SkippedToken {
                    token: token.clone(),
                    reason: SkipReason::NoData,
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        if candles.len() < min_candles {
            warn!(
                token = %token,
                candles = candles.len(),
                minimum = min_candles,
                "skipping token with insufficient history"
            );
            skipped.push(SkippedToken {
                token: token.clone(),
                reason: SkipReason::InsufficientCandles {
                    candles: candles.len(),
                },
            });
            continue;
        }

        info!(token = %token, candles = candles.len(), "loaded");
        series.push((token.clone(), candles));
    }

    if series.is_empty() {
        let longest = skipped
            .iter()
            .filter_map(|s| match s.reason {
                SkipReason::InsufficientCandles { candles } => Some((s.token.clone(), candles)),
                SkipReason::NoData => None,
            })
            .max_by_key(|(_, candles)| *candles);
        return Err(match longest {
            Some((token, candles)) => ArenaError::InsufficientData {
                token,
                candles,
                minimum: min_candles,
            },
            None => ArenaError::NoData {
                path: data_port.describe(),
            },
        });
    }

    if !skipped.is_empty() {
        info!(
            loaded = series.len(),
            requested = tokens.len(),
            "some tokens were skipped"
        );
    }

    Ok(LoadedMarket {
        market: MarketData::new(series),
        skipped,
    })
}
