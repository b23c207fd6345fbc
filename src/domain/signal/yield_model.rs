//! Daily yield of market-neutral strategies.
//!
//! Market-neutral agents never trade direction; each simulated day their
//! cash compounds by a small randomized return drawn from the agent's own
//! stream. The number of draws a call consumes depends on the strategy and
//! on the draws themselves, so the outcome of day N depends on every draw
//! before it.

use crate::domain::agent::Aggression;
use crate::domain::rng::DeterministicStream;

/// Carry-style yield: a random APY accrued daily, damped in volatile
/// markets, with a rare protocol loss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarryParams {
    pub apy_floor: f64,
    pub apy_span: f64,
    /// (volatility above, multiplier) pairs; the first match applies.
    pub dampening: &'static [(f64, f64)],
    pub shock_probability: f64,
    pub shock_loss: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YieldModel {
    Carry(CarryParams),
    /// Occasional airdrop windfall, otherwise a small gas bleed.
    Airdrop,
    /// Volatility-driven arbitrage opportunities net of gas.
    Arbitrage,
}

const FUNDING_CARRY: CarryParams = CarryParams {
    apy_floor: 0.06,
    apy_span: 0.09,
    dampening: &[(0.05, 0.3), (0.03, 0.7)],
    shock_probability: 0.001,
    shock_loss: 0.05,
};

const DELTA_NEUTRAL_CARRY: CarryParams = CarryParams {
    apy_floor: 0.03,
    apy_span: 0.05,
    dampening: &[(0.05, 0.5)],
    shock_probability: 0.0005,
    shock_loss: 0.03,
};

const AIRDROP_PROBABILITY: f64 = 0.008;
const ARB_MIN_VOLATILITY: f64 = 0.015;

pub fn model_for(strategy: &str) -> Option<YieldModel> {
    match strategy {
        "Funding Rate Farming" | "Basis Trading" | "Lending Rate Arb" => {
            Some(YieldModel::Carry(FUNDING_CARRY))
        }
        "Delta Neutral" => Some(YieldModel::Carry(DELTA_NEUTRAL_CARRY)),
        "Airdrop Farming" => Some(YieldModel::Airdrop),
        "Flash Loan Arb" | "Cross-Chain Arb" | "MEV Extraction" => Some(YieldModel::Arbitrage),
        _ => None,
    }
}

/// Daily return fraction for `strategy`. Strategies without a yield model
/// earn zero and consume no draws.
pub fn compute_yield(
    strategy: &str,
    avg_volatility: f64,
    stream: &mut DeterministicStream,
    aggression: Aggression,
) -> f64 {
    let mult = aggression.yield_multiplier();
    match model_for(strategy) {
        Some(YieldModel::Carry(params)) => carry_yield(&params, avg_volatility, stream, mult),
        Some(YieldModel::Airdrop) => {
            if stream.next_f64() < AIRDROP_PROBABILITY {
                (0.02 + stream.next_f64() * 0.08) * mult
            } else {
                -0.0001 * mult
            }
        }
        Some(YieldModel::Arbitrage) => {
            if avg_volatility < ARB_MIN_VOLATILITY {
                return 0.0;
            }
            if stream.next_f64() >= avg_volatility * 5.0 {
                return 0.0;
            }
            let profit = avg_volatility * stream.next_f64() * 0.008 * mult;
            let gas = 0.0003 + stream.next_f64() * 0.0005;
            profit - gas
        }
        None => 0.0,
    }
}

fn carry_yield(
    params: &CarryParams,
    avg_volatility: f64,
    stream: &mut DeterministicStream,
    mult: f64,
) -> f64 {
    let apy = params.apy_floor + stream.next_f64() * params.apy_span;
    let mut daily = (apy / 365.0) * mult;
    if let Some(&(_, damp)) = params
        .dampening
        .iter()
        .find(|(threshold, _)| avg_volatility > *threshold)
    {
        daily *= damp;
    }
    if stream.next_f64() < params.shock_probability {
        return -params.shock_loss * mult;
    }
    daily
}
