//! Aggregate statistics over a population of simulation results.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::simulator::SimulationResult;
use crate::domain::strategy::RiskTier;

/// Dimension results are grouped along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Strategy,
    Category,
    RiskTier,
    Aggression,
}

impl GroupBy {
    fn key(self, result: &SimulationResult) -> String {
        let agent = &result.agent;
        match self {
            GroupBy::Strategy => agent.primary_strategy.clone(),
            GroupBy::Category => agent.category.clone(),
            GroupBy::RiskTier => agent.risk_tier.label().to_string(),
            GroupBy::Aggression => agent.aggression.label().to_string(),
        }
    }
}

/// Short reference to one agent's outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentBrief {
    pub id: u32,
    pub name: String,
    pub strategy: String,
    pub return_pct: f64,
}

impl From<&SimulationResult> for AgentBrief {
    fn from(result: &SimulationResult) -> Self {
        AgentBrief {
            id: result.agent.id,
            name: result.agent.name.clone(),
            strategy: result.agent.primary_strategy.clone(),
            return_pct: result.return_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArenaSummary {
    pub agents: usize,
    pub total_capital: f64,
    pub total_final_value: f64,
    pub net_pnl: f64,
    pub avg_return_pct: f64,
    pub median_return_pct: f64,
    pub profitable: usize,
    pub unprofitable: usize,
    pub avg_trades: f64,
    /// Mean win rate over agents that traded at least once.
    pub avg_win_rate: f64,
    pub avg_max_drawdown_pct: f64,
    pub best: Option<AgentBrief>,
    pub worst: Option<AgentBrief>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub key: String,
    pub count: usize,
    pub avg_return_pct: f64,
    pub median_return_pct: f64,
    pub avg_win_rate: f64,
    pub profitable: usize,
    pub avg_max_drawdown_pct: f64,
    /// Set for strategy groups only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_tier: Option<RiskTier>,
}

impl GroupStats {
    pub fn profitable_pct(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.profitable as f64 / self.count as f64 * 100.0
        }
    }
}

/// Everything the reports consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub summary: ArenaSummary,
    pub by_strategy: Vec<GroupStats>,
    pub by_category: Vec<GroupStats>,
    pub by_risk_tier: Vec<GroupStats>,
    pub by_aggression: Vec<GroupStats>,
}

impl Aggregate {
    pub fn from_results(results: &[SimulationResult]) -> Self {
        Aggregate {
            summary: summarize(results),
            by_strategy: group_stats(results, GroupBy::Strategy),
            by_category: group_stats(results, GroupBy::Category),
            by_risk_tier: group_stats(results, GroupBy::RiskTier),
            by_aggression: group_stats(results, GroupBy::Aggression),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Element at `len / 2` of the ascending returns.
fn median_return(results: &[&SimulationResult]) -> f64 {
    let mut returns: Vec<f64> = results.iter().map(|r| r.return_pct).collect();
    returns.sort_by(f64::total_cmp);
    returns.get(returns.len() / 2).copied().unwrap_or(0.0)
}

/// Element at `len / 2` of the descending returns. For an even count this is
/// the lower of the two middle values, unlike [`median_return`].
fn headline_median(results: &[&SimulationResult]) -> f64 {
    let mut returns: Vec<f64> = results.iter().map(|r| r.return_pct).collect();
    returns.sort_by(|a, b| b.total_cmp(a));
    returns.get(returns.len() / 2).copied().unwrap_or(0.0)
}

fn avg_win_rate(results: &[&SimulationResult]) -> f64 {
    mean(
        results
            .iter()
            .filter(|r| r.trade_count > 0)
            .map(|r| r.win_rate),
    )
}

pub fn summarize(results: &[SimulationResult]) -> ArenaSummary {
    let all: Vec<&SimulationResult> = results.iter().collect();
    let total_capital: f64 = results.iter().map(|r| r.initial_capital).sum();
    let total_final_value: f64 = results.iter().map(|r| r.final_value).sum();
    let profitable = results.iter().filter(|r| r.is_profitable()).count();

    let by_return = |a: &&SimulationResult, b: &&SimulationResult| {
        a.return_pct
            .total_cmp(&b.return_pct)
            .then(b.agent.id.cmp(&a.agent.id))
    };
    let best = results.iter().max_by(by_return).map(AgentBrief::from);
    let worst = results.iter().min_by(by_return).map(AgentBrief::from);

    ArenaSummary {
        agents: results.len(),
        total_capital,
        total_final_value,
        net_pnl: total_final_value - total_capital,
        avg_return_pct: mean(results.iter().map(|r| r.return_pct)),
        median_return_pct: headline_median(&all),
        profitable,
        unprofitable: results.len() - profitable,
        avg_trades: mean(results.iter().map(|r| f64::from(r.trade_count))),
        avg_win_rate: avg_win_rate(&all),
        avg_max_drawdown_pct: mean(results.iter().map(|r| r.max_drawdown_pct)),
        best,
        worst,
    }
}

/// Per-group statistics sorted by average return, best first.
pub fn group_stats(results: &[SimulationResult], by: GroupBy) -> Vec<GroupStats> {
    let mut groups: BTreeMap<String, Vec<&SimulationResult>> = BTreeMap::new();
    for result in results {
        groups.entry(by.key(result)).or_default().push(result);
    }

    let mut stats: Vec<GroupStats> = groups
        .into_iter()
        .map(|(key, members)| {
            let (category, risk_tier) = match (by, members.first()) {
                (GroupBy::Strategy, Some(first)) => {
                    (Some(first.agent.category.clone()), Some(first.agent.risk_tier))
                }
                _ => (None, None),
            };
            GroupStats {
                count: members.len(),
                avg_return_pct: mean(members.iter().map(|r| r.return_pct)),
                median_return_pct: median_return(&members),
                avg_win_rate: avg_win_rate(&members),
                profitable: members.iter().filter(|r| r.is_profitable()).count(),
                avg_max_drawdown_pct: mean(members.iter().map(|r| r.max_drawdown_pct)),
                category,
                risk_tier,
                key,
            }
        })
        .collect();
    stats.sort_by(|a, b| {
        b.avg_return_pct
            .total_cmp(&a.avg_return_pct)
            .then_with(|| a.key.cmp(&b.key))
    });
    stats
}
