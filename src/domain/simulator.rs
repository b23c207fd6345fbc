//! Day-by-day portfolio simulation of one agent.
//!
//! Each simulated day either accrues a market-neutral yield on cash or runs a
//! stop-loss pass followed by a signal pass over the agent's tokens, then
//! marks the portfolio to market and updates its drawdown.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::domain::agent::{Agent, AgentProfile};
use crate::domain::catalog::Catalog;
use crate::domain::execution::{
    drawdown_multiplier, enter_long, exit_long, position_size, sell_fraction, stop_out,
    ExecutionConfig, StopRule,
};
use crate::domain::market::{MarketData, TokenData};
use crate::domain::portfolio::PortfolioState;
use crate::domain::rng::DeterministicStream;
use crate::domain::signal::yield_model::compute_yield;
use crate::domain::signal::{Signal, SignalContext, SignalEngine};

pub const DEFAULT_INITIAL_CAPITAL: f64 = 1000.0;
pub const DEFAULT_WARMUP: usize = 20;
pub const DEFAULT_MIN_CANDLES: usize = 30;
/// Stand-in volatility for a token with no reading on the day.
const FALLBACK_VOLATILITY: f64 = 0.02;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_capital: f64,
    /// First simulated day index.
    pub warmup: usize,
    /// Tokens with fewer candles are not traded.
    pub min_candles: usize,
    pub execution: ExecutionConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            warmup: DEFAULT_WARMUP,
            min_candles: DEFAULT_MIN_CANDLES,
            execution: ExecutionConfig::default(),
        }
    }
}

/// Outcome of one agent's simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    #[serde(flatten)]
    pub agent: AgentProfile,
    pub initial_capital: f64,
    pub final_value: f64,
    pub return_pct: f64,
    pub trade_count: u32,
    pub win_count: u32,
    pub loss_count: u32,
    pub win_rate: f64,
    /// Largest peak-to-trough decline, in percent.
    pub max_drawdown_pct: f64,
}

impl SimulationResult {
    /// Zero-activity result for an agent with nothing to trade.
    pub fn degenerate(agent: AgentProfile, initial_capital: f64) -> Self {
        SimulationResult {
            agent,
            initial_capital,
            final_value: initial_capital,
            return_pct: 0.0,
            trade_count: 0,
            win_count: 0,
            loss_count: 0,
            win_rate: 0.0,
            max_drawdown_pct: 0.0,
        }
    }

    fn from_portfolio(agent: AgentProfile, portfolio: &PortfolioState, final_value: f64) -> Self {
        let initial = portfolio.initial_capital;
        let decided = (portfolio.win_count + portfolio.loss_count).max(1);
        let win_rate = if portfolio.trade_count > 0 {
            f64::from(portfolio.win_count) / f64::from(decided) * 100.0
        } else {
            0.0
        };
        SimulationResult {
            agent,
            initial_capital: initial,
            final_value: round_cents(final_value),
            return_pct: round_cents((final_value - initial) / initial * 100.0),
            trade_count: portfolio.trade_count,
            win_count: portfolio.win_count,
            loss_count: portfolio.loss_count,
            win_rate: round_cents(win_rate),
            max_drawdown_pct: round_cents(portfolio.max_drawdown * 100.0),
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.return_pct > 0.0
    }
}

/// Round half up to two decimals.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Run `agent` over `market`, continuing to draw from its stream.
pub fn simulate(
    agent: &mut Agent,
    market: &MarketData,
    catalog: &Catalog,
    config: &SimulationConfig,
) -> SimulationResult {
    let Agent { profile, stream } = agent;
    let profile: &AgentProfile = profile;

    let tokens: Vec<&TokenData> = profile
        .preferred_tokens
        .iter()
        .filter_map(|token| market.get(token))
        .filter(|data| data.len() >= config.min_candles)
        .collect();
    if tokens.is_empty() {
        debug!(agent = profile.id, "no tradable tokens");
        return SimulationResult::degenerate(profile.clone(), config.initial_capital);
    }

    let mut portfolio =
        PortfolioState::new(config.initial_capital, tokens.iter().map(|d| d.token.as_str()));
    let days = tokens.iter().map(|d| d.len()).max().unwrap_or(0);
    let market_neutral = catalog.is_market_neutral(&profile.primary_strategy);
    let engine = SignalEngine::new(catalog);
    let stop = StopRule::for_style(profile.risk_style);
    let mut marks = vec![0.0; tokens.len()];

    for day in config.warmup..days {
        if market_neutral {
            accrue_yield(&mut portfolio, profile, stream, &tokens, day);
        } else {
            stop_pass(&mut portfolio, stop, &tokens, day, &config.execution);
            signal_pass(&mut portfolio, &engine, profile, &tokens, day, &mut marks, config);
        }
        fill_marks(&mut marks, &tokens, day);
        let value = portfolio.total_value(&marks);
        portfolio.record_valuation(value);
    }

    let closes: Vec<f64> = tokens.iter().map(|d| d.last_close()).collect();
    let final_value = portfolio.total_value(&closes);
    trace!(
        agent = profile.id,
        final_value,
        trades = portfolio.trade_count,
        "simulation finished"
    );
    SimulationResult::from_portfolio(profile.clone(), &portfolio, final_value)
}

fn fill_marks(marks: &mut [f64], tokens: &[&TokenData], day: usize) {
    for (mark, data) in marks.iter_mut().zip(tokens) {
        *mark = data.close_at(day);
    }
}

fn accrue_yield(
    portfolio: &mut PortfolioState,
    profile: &AgentProfile,
    stream: &mut DeterministicStream,
    tokens: &[&TokenData],
    day: usize,
) {
    let total: f64 = tokens
        .iter()
        .map(|data| {
            let index = day.min(data.len() - 1);
            data.indicators
                .volatility14
                .at(index)
                .unwrap_or(FALLBACK_VOLATILITY)
        })
        .sum();
    let avg_volatility = total / tokens.len() as f64;
    let daily = compute_yield(
        &profile.primary_strategy,
        avg_volatility,
        stream,
        profile.aggression,
    );
    portfolio.apply_yield(daily);
}

fn stop_pass(
    portfolio: &mut PortfolioState,
    stop: StopRule,
    tokens: &[&TokenData],
    day: usize,
    execution: &ExecutionConfig,
) {
    for (slot, data) in tokens.iter().enumerate() {
        if day >= data.len() || !portfolio.positions[slot].is_open() {
            continue;
        }
        let price = data.candles[day].close;
        let position = &mut portfolio.positions[slot];
        position.update_peak(price);
        let unrealized = position.unrealized_return(price);
        let from_peak = position.return_from_peak(price);
        if stop.triggered(unrealized, from_peak) {
            trace!(token = %data.token, day, "stop triggered");
            stop_out(portfolio, slot, price, execution);
        }
    }
}

fn signal_pass(
    portfolio: &mut PortfolioState,
    engine: &SignalEngine<'_>,
    profile: &AgentProfile,
    tokens: &[&TokenData],
    day: usize,
    marks: &mut [f64],
    config: &SimulationConfig,
) {
    let execution = &config.execution;
    for (slot, data) in tokens.iter().enumerate() {
        if day >= data.len() {
            continue;
        }
        let ctx = SignalContext::new(&data.candles, &data.indicators, day, profile);
        let decision = engine.decide(profile, &ctx);
        let price = ctx.close();

        match decision.signal {
            Signal::Buy if portfolio.cash > execution.min_cash_to_buy => {
                fill_marks(marks, tokens, day);
                let value = portfolio.total_value(marks);
                let throttle = drawdown_multiplier(portfolio.drawdown_ratio(value));
                let size = position_size(profile.aggression, profile.risk_style, value, execution);
                let notional = (size * decision.confidence * throttle)
                    .min(portfolio.cash * execution.max_cash_fraction);
                enter_long(portfolio, slot, price, notional, execution);
            }
            Signal::Sell => {
                exit_long(
                    portfolio,
                    slot,
                    price,
                    sell_fraction(decision.confidence),
                    execution,
                );
            }
            _ => {}
        }
    }
}
