//! Strategy name to rule dispatch table.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::{averages, oscillators, returns, schedule, volume, SignalContext, SignalOutput};

pub type RuleFn = fn(&SignalContext<'_>) -> SignalOutput;

static RULES: OnceLock<HashMap<&'static str, RuleFn>> = OnceLock::new();

fn rules() -> &'static HashMap<&'static str, RuleFn> {
    RULES.get_or_init(|| {
        let mut rules: HashMap<&'static str, RuleFn> = HashMap::new();
        rules.insert("Funding Rate Farming", schedule::yield_accrual);
        rules.insert("Basis Trading", schedule::yield_accrual);
        rules.insert("Delta Neutral", schedule::yield_accrual);
        rules.insert("Lending Rate Arb", schedule::yield_accrual);
        rules.insert("Airdrop Farming", schedule::yield_accrual);
        rules.insert("Yield Rotation", averages::sma_trend);
        rules.insert("Concentrated LP", averages::sma_trend);
        rules.insert("IL Hedging", averages::sma_trend);
        rules.insert("Governance Arb", averages::sma_trend);
        rules.insert("Flash Loan Arb", volume::volatility_arb);
        rules.insert("Cross-Chain Arb", volume::volatility_arb);
        rules.insert("Liquidation Hunting", returns::liquidation_hunting);
        rules.insert("Recursive Lending", returns::liquidation_hunting);
        rules.insert("MEV Extraction", volume::mev_extraction);
        rules.insert("Memecoin Momentum", returns::memecoin_momentum);
        rules.insert("Token Sniping", returns::memecoin_momentum);
        rules.insert("KOL Copy Trading", returns::copy_trading);
        rules.insert("Whale Tracking", returns::copy_trading);
        rules.insert("Liquidation Cascade", returns::liquidation_cascade);
        rules.insert("Mean Reversion", oscillators::mean_reversion);
        rules.insert("Momentum", averages::momentum);
        rules.insert("Pairs Trading", averages::pairs_trading);
        rules.insert("Stat Arb", averages::pairs_trading);
        rules.insert("Market Making", returns::market_making);
        rules.insert("Grid Trading", averages::grid_trading);
        rules.insert("Volatility Trading", volume::volatility_trading);
        rules.insert("Correlation Breakdown", returns::correlation_breakdown);
        rules.insert("Volatility Regime", oscillators::volatility_regime);
        rules.insert("Breakout Trading", averages::breakout_trading);
        rules.insert("RSI Divergence", oscillators::rsi_divergence);
        rules.insert("Bollinger Squeeze", volume::bollinger_squeeze);
        rules.insert("Ichimoku Cloud", averages::ichimoku_cloud);
        rules.insert("Fibonacci", averages::fibonacci);
        rules.insert("Volume Profile", volume::volume_profile);
        rules.insert("Order Flow", volume::volume_profile);
        rules.insert("VWAP Strategy", averages::vwap_strategy);
        rules.insert("EMA Ribbon", averages::ema_ribbon);
        rules.insert("Sentiment Trading", returns::news_trading);
        rules.insert("News Trading", returns::news_trading);
        rules.insert("Fear/Greed", oscillators::fear_greed);
        rules.insert("On-Chain Analytics", volume::on_chain_analytics);
        rules.insert("Scalping", returns::scalping);
        rules.insert("Swing Trading", returns::swing_trading);
        rules.insert("Position Trading", averages::position_trading);
        rules.insert("HODL + DCA", schedule::hodl_dca);
        rules.insert("Martingale", returns::martingale);
        rules
    })
}

/// Rule registered for `strategy`, if any.
pub fn lookup(strategy: &str) -> Option<RuleFn> {
    rules().get(strategy).copied()
}

/// All registered strategy names, sorted.
pub fn strategy_names() -> Vec<&'static str> {
    let mut names: Vec<_> = rules().keys().copied().collect();
    names.sort_unstable();
    names
}
