//! Trade execution: costs, sizing, stop-losses and fills.
//!
//! Buys fill above the market price and sells below it by the combined
//! slippage and fee fraction. Orders below the minimum notional are skipped.

use super::agent::{Aggression, RiskStyle};
use super::portfolio::PortfolioState;

pub const DEFAULT_TRADE_FEE: f64 = 0.001;
pub const DEFAULT_SLIPPAGE: f64 = 0.0005;
pub const DEFAULT_MAX_POSITION_PCT: f64 = 0.25;
pub const DEFAULT_MIN_TRADE_VALUE: f64 = 5.0;
pub const DEFAULT_MIN_CASH_TO_BUY: f64 = 10.0;
pub const DEFAULT_MAX_CASH_FRACTION: f64 = 0.9;

/// Confidence at or above which a SELL liquidates the whole position.
const FULL_EXIT_CONFIDENCE: f64 = 0.9;
/// Largest partial SELL fraction.
const MAX_PARTIAL_EXIT: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    pub trade_fee: f64,
    pub slippage: f64,
    /// Cap on a single entry as a fraction of portfolio value.
    pub max_position_pct: f64,
    pub min_trade_value: f64,
    /// Buys require strictly more cash than this.
    pub min_cash_to_buy: f64,
    /// Largest fraction of cash a single buy may spend.
    pub max_cash_fraction: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            trade_fee: DEFAULT_TRADE_FEE,
            slippage: DEFAULT_SLIPPAGE,
            max_position_pct: DEFAULT_MAX_POSITION_PCT,
            min_trade_value: DEFAULT_MIN_TRADE_VALUE,
            min_cash_to_buy: DEFAULT_MIN_CASH_TO_BUY,
            max_cash_fraction: DEFAULT_MAX_CASH_FRACTION,
        }
    }
}

/// Buy fill: market_price * (1 + slippage + fee).
pub fn buy_price(market_price: f64, config: &ExecutionConfig) -> f64 {
    market_price * (1.0 + config.slippage + config.trade_fee)
}

/// Sell fill: market_price * (1 - slippage - fee).
pub fn sell_price(market_price: f64, config: &ExecutionConfig) -> f64 {
    market_price * (1.0 - config.slippage - config.trade_fee)
}

/// Full-confidence entry size for a portfolio worth `portfolio_value`.
pub fn position_size(
    aggression: Aggression,
    risk_style: RiskStyle,
    portfolio_value: f64,
    config: &ExecutionConfig,
) -> f64 {
    let size = portfolio_value * aggression.base_position_fraction() * risk_style.size_multiplier();
    size.min(portfolio_value * config.max_position_pct)
}

/// Entry size multiplier from the ratio of current value to peak value.
pub fn drawdown_multiplier(ratio: f64) -> f64 {
    if ratio < 0.7 {
        0.25
    } else if ratio < 0.85 {
        0.5
    } else {
        1.0
    }
}

/// Fraction of a position a SELL of `confidence` liquidates.
pub fn sell_fraction(confidence: f64) -> f64 {
    if confidence >= FULL_EXIT_CONFIDENCE {
        1.0
    } else {
        confidence.min(MAX_PARTIAL_EXIT)
    }
}

/// Risk-style exit rule evaluated before signals each day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopRule {
    /// Exit when price falls more than this fraction below the peak since
    /// entry.
    Trailing(f64),
    /// Exit when the loss against average cost exceeds this fraction.
    Loss(f64),
}

impl StopRule {
    pub fn for_style(style: RiskStyle) -> Self {
        match style {
            RiskStyle::TrailingStops => StopRule::Trailing(0.08),
            RiskStyle::Conservative => StopRule::Loss(0.10),
            RiskStyle::FixedFractional => StopRule::Loss(0.15),
            _ => StopRule::Loss(0.25),
        }
    }

    /// `unrealized` is the return against cost, `from_peak` the return
    /// against the peak since entry.
    pub fn triggered(self, unrealized: f64, from_peak: f64) -> bool {
        match self {
            StopRule::Trailing(limit) => from_peak < -limit,
            StopRule::Loss(limit) => unrealized < -limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryResult {
    Entered {
        quantity: f64,
        execution_price: f64,
        cost: f64,
    },
    BelowMinimum,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExitResult {
    Exited {
        quantity: f64,
        execution_price: f64,
        proceeds: f64,
        win: bool,
    },
    BelowMinimum,
    NoPosition,
}

/// Spend `notional` on the position at `slot`.
pub fn enter_long(
    portfolio: &mut PortfolioState,
    slot: usize,
    market_price: f64,
    notional: f64,
    config: &ExecutionConfig,
) -> EntryResult {
    if notional < config.min_trade_value {
        return EntryResult::BelowMinimum;
    }
    let execution_price = buy_price(market_price, config);
    let quantity = notional / execution_price;
    portfolio.positions[slot].add(quantity, execution_price, market_price);
    portfolio.cash -= notional;
    portfolio.record_entry();
    EntryResult::Entered {
        quantity,
        execution_price,
        cost: notional,
    }
}

/// Sell `fraction` of the position at `slot`. A win is proceeds above the
/// cost basis of the quantity sold.
pub fn exit_long(
    portfolio: &mut PortfolioState,
    slot: usize,
    market_price: f64,
    fraction: f64,
    config: &ExecutionConfig,
) -> ExitResult {
    let position = &portfolio.positions[slot];
    if !position.is_open() {
        return ExitResult::NoPosition;
    }
    let quantity = position.quantity * fraction;
    if quantity * market_price < config.min_trade_value {
        return ExitResult::BelowMinimum;
    }
    let execution_price = sell_price(market_price, config);
    let proceeds = quantity * execution_price;
    let win = proceeds > quantity * position.average_cost;

    portfolio.positions[slot].reduce(quantity);
    portfolio.cash += proceeds;
    portfolio.record_exit(win);
    ExitResult::Exited {
        quantity,
        execution_price,
        proceeds,
        win,
    }
}

/// Liquidate the whole position at `slot` regardless of size.
pub fn stop_out(
    portfolio: &mut PortfolioState,
    slot: usize,
    market_price: f64,
    config: &ExecutionConfig,
) -> ExitResult {
    let position = &portfolio.positions[slot];
    if !position.is_open() {
        return ExitResult::NoPosition;
    }
    let quantity = position.quantity;
    let execution_price = sell_price(market_price, config);
    let proceeds = quantity * execution_price;
    let win = proceeds > quantity * position.average_cost;

    portfolio.positions[slot].close();
    portfolio.cash += proceeds;
    portfolio.record_exit(win);
    ExitResult::Exited {
        quantity,
        execution_price,
        proceeds,
        win,
    }
}
