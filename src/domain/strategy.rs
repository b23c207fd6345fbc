//! Strategy catalogue entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse risk label attached to each strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Med,
    High,
    Degen,
}

impl RiskTier {
    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Med => "MED",
            RiskTier::High => "HIGH",
            RiskTier::Degen => "DEGEN",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyDef {
    pub name: String,
    pub category: String,
    pub risk_tier: RiskTier,
}

impl StrategyDef {
    pub fn new(name: &str, category: &str, risk_tier: RiskTier) -> Self {
        StrategyDef {
            name: name.to_string(),
            category: category.to_string(),
            risk_tier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_fields() {
        let s = StrategyDef::new("Mean Reversion", "Quant", RiskTier::Med);
        assert_eq!(s.name, "Mean Reversion");
        assert_eq!(s.category, "Quant");
        assert_eq!(s.risk_tier, RiskTier::Med);
    }

    #[test]
    fn risk_tier_labels() {
        assert_eq!(RiskTier::Low.to_string(), "LOW");
        assert_eq!(RiskTier::Degen.to_string(), "DEGEN");
    }

    #[test]
    fn risk_tier_serializes_uppercase() {
        let json = serde_json::to_string(&RiskTier::High).unwrap();
        assert_eq!(json, "\"HIGH\"");
    }
}
