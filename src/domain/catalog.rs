//! Strategy catalogs.
//!
//! A catalog is configuration data for the shared engine: the strategy table
//! agents draw from, which of those strategies earn through the yield model
//! instead of directional trades, which have their entries gated by the trend
//! filter, and the token universe agents pick preferences from.

use std::collections::BTreeSet;

use crate::domain::error::ArenaError;
use crate::domain::strategy::{RiskTier, StrategyDef};

pub const CATALOG_NAMES: &[&str] = &["crypto", "quant"];

pub const DEFAULT_TOKENS: &[&str] = &["SOL", "BONK", "WIF", "JUP", "JTO", "RAY"];

const CRYPTO_STRATEGIES: &[(&str, &str, RiskTier)] = &[
    ("MEV Extraction", "Crypto", RiskTier::High),
    ("Funding Rate Farming", "DeFi", RiskTier::Low),
    ("Basis Trading", "DeFi", RiskTier::Low),
    ("Delta Neutral", "DeFi", RiskTier::Low),
    ("Yield Rotation", "DeFi", RiskTier::Med),
    ("Flash Loan Arb", "Crypto", RiskTier::Med),
    ("Cross-Chain Arb", "Crypto", RiskTier::High),
    ("Memecoin Momentum", "Crypto", RiskTier::Degen),
    ("KOL Copy Trading", "Crypto", RiskTier::Med),
    ("Whale Tracking", "Crypto", RiskTier::Med),
    ("Token Sniping", "Crypto", RiskTier::Degen),
    ("Airdrop Farming", "DeFi", RiskTier::Low),
    ("Concentrated LP", "DeFi", RiskTier::Med),
    ("IL Hedging", "DeFi", RiskTier::Med),
    ("Lending Rate Arb", "DeFi", RiskTier::Low),
    ("Liquidation Hunting", "DeFi", RiskTier::High),
    ("Recursive Lending", "DeFi", RiskTier::High),
    ("Mean Reversion", "Quant", RiskTier::Med),
    ("Momentum", "Quant", RiskTier::Med),
    ("Pairs Trading", "Quant", RiskTier::Low),
    ("Stat Arb", "Quant", RiskTier::Med),
    ("Market Making", "Quant", RiskTier::Med),
    ("Breakout Trading", "TA", RiskTier::High),
    ("Grid Trading", "Quant", RiskTier::Med),
    ("Volatility Trading", "Quant", RiskTier::High),
    ("RSI Divergence", "TA", RiskTier::Med),
    ("Bollinger Squeeze", "TA", RiskTier::Med),
    ("Ichimoku Cloud", "TA", RiskTier::Med),
    ("Fibonacci", "TA", RiskTier::Med),
    ("Volume Profile", "TA", RiskTier::Med),
    ("Order Flow", "TA", RiskTier::High),
    ("VWAP Strategy", "TA", RiskTier::Low),
    ("EMA Ribbon", "TA", RiskTier::Med),
    ("Sentiment Trading", "Alt Data", RiskTier::High),
    ("Fear/Greed", "Alt Data", RiskTier::Med),
    ("News Trading", "Alt Data", RiskTier::High),
    ("On-Chain Analytics", "Alt Data", RiskTier::Med),
    ("Scalping", "Time", RiskTier::Med),
    ("Swing Trading", "Time", RiskTier::Med),
    ("Position Trading", "Time", RiskTier::Low),
    ("HODL + DCA", "Time", RiskTier::Low),
    ("Martingale", "Risk", RiskTier::Degen),
    ("Liquidation Cascade", "Crypto", RiskTier::Degen),
    ("Governance Arb", "DeFi", RiskTier::Med),
    ("Correlation Breakdown", "Quant", RiskTier::High),
    ("Volatility Regime", "Quant", RiskTier::Med),
];

const QUANT_STRATEGIES: &[(&str, &str, RiskTier)] = &[
    ("Mean Reversion", "Mean Reversion", RiskTier::Med),
    ("Pairs Trading", "Mean Reversion", RiskTier::Low),
    ("Stat Arb", "Mean Reversion", RiskTier::Med),
    ("Grid Trading", "Mean Reversion", RiskTier::Med),
    ("VWAP Strategy", "Mean Reversion", RiskTier::Low),
    ("RSI Divergence", "Mean Reversion", RiskTier::Med),
    ("Momentum", "Trend", RiskTier::Med),
    ("Breakout Trading", "Trend", RiskTier::High),
    ("EMA Ribbon", "Trend", RiskTier::Med),
    ("Ichimoku Cloud", "Trend", RiskTier::Med),
    ("Fibonacci", "Trend", RiskTier::Med),
    ("Swing Trading", "Trend", RiskTier::Med),
    ("Position Trading", "Trend", RiskTier::Low),
    ("HODL + DCA", "Trend", RiskTier::Low),
    ("Volatility Trading", "Volatility", RiskTier::High),
    ("Volatility Regime", "Volatility", RiskTier::Med),
    ("Bollinger Squeeze", "Volatility", RiskTier::Med),
    ("Correlation Breakdown", "Volatility", RiskTier::High),
    ("Market Making", "Microstructure", RiskTier::Med),
    ("Scalping", "Microstructure", RiskTier::Med),
    ("Order Flow", "Microstructure", RiskTier::High),
    ("Volume Profile", "Microstructure", RiskTier::Med),
    ("Basis Trading", "Arbitrage", RiskTier::Low),
    ("Delta Neutral", "Arbitrage", RiskTier::Low),
    ("Martingale", "Risk", RiskTier::Degen),
];

const CRYPTO_MARKET_NEUTRAL: &[&str] = &[
    "Funding Rate Farming",
    "Basis Trading",
    "Delta Neutral",
    "Lending Rate Arb",
    "Airdrop Farming",
    "Flash Loan Arb",
    "Cross-Chain Arb",
    "MEV Extraction",
];

const QUANT_MARKET_NEUTRAL: &[&str] = &["Basis Trading", "Delta Neutral"];

const TREND_FILTERED: &[&str] = &[
    "Mean Reversion",
    "Swing Trading",
    "Grid Trading",
    "HODL + DCA",
    "Martingale",
    "Breakout Trading",
    "Momentum",
    "EMA Ribbon",
    "Pairs Trading",
    "Stat Arb",
    "VWAP Strategy",
    "Scalping",
    "Market Making",
    "Position Trading",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub name: String,
    pub strategies: Vec<StrategyDef>,
    pub market_neutral: BTreeSet<String>,
    pub trend_filtered: BTreeSet<String>,
    pub tokens: Vec<String>,
}

impl Catalog {
    /// Crypto-native and DeFi strategy table.
    pub fn crypto() -> Self {
        Self::build("crypto", CRYPTO_STRATEGIES, CRYPTO_MARKET_NEUTRAL)
    }

    /// Pure quantitative-finance strategy table.
    pub fn quant() -> Self {
        Self::build("quant", QUANT_STRATEGIES, QUANT_MARKET_NEUTRAL)
    }

    pub fn by_name(name: &str) -> Result<Self, ArenaError> {
        match name.trim().to_lowercase().as_str() {
            "crypto" => Ok(Self::crypto()),
            "quant" => Ok(Self::quant()),
            other => Err(ArenaError::UnknownCatalog(other.to_string())),
        }
    }

    fn build(
        name: &str,
        table: &[(&str, &str, RiskTier)],
        market_neutral: &[&str],
    ) -> Self {
        let strategies: Vec<StrategyDef> = table
            .iter()
            .map(|&(name, category, tier)| StrategyDef::new(name, category, tier))
            .collect();
        let trend_filtered = TREND_FILTERED
            .iter()
            .copied()
            .filter(|s| strategies.iter().any(|d| d.name == *s))
            .map(str::to_string)
            .collect();
        Catalog {
            name: name.to_string(),
            market_neutral: market_neutral.iter().map(|s| s.to_string()).collect(),
            trend_filtered,
            strategies,
            tokens: DEFAULT_TOKENS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_tokens(mut self, tokens: Vec<String>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_market_neutral(mut self, names: Vec<String>) -> Self {
        self.market_neutral = names.into_iter().collect();
        self
    }

    pub fn with_trend_filtered(mut self, names: Vec<String>) -> Self {
        self.trend_filtered = names.into_iter().collect();
        self
    }

    pub fn strategy(&self, name: &str) -> Option<&StrategyDef> {
        self.strategies.iter().find(|s| s.name == name)
    }

    pub fn is_market_neutral(&self, name: &str) -> bool {
        self.market_neutral.contains(name)
    }

    pub fn is_trend_filtered(&self, name: &str) -> bool {
        self.trend_filtered.contains(name)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::crypto()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::registry;

    #[test]
    fn crypto_catalog_shape() {
        let catalog = Catalog::crypto();
        assert_eq!(catalog.len(), 46);
        assert_eq!(catalog.market_neutral.len(), 8);
        assert_eq!(catalog.trend_filtered.len(), 14);
        assert_eq!(catalog.tokens, vec!["SOL", "BONK", "WIF", "JUP", "JTO", "RAY"]);
        assert_eq!(catalog.strategies[0].name, "MEV Extraction");
        assert_eq!(catalog.strategies[45].name, "Volatility Regime");
    }

    #[test]
    fn quant_catalog_shape() {
        let catalog = Catalog::quant();
        assert_eq!(catalog.len(), 25);
        assert!(catalog.is_market_neutral("Basis Trading"));
        assert!(!catalog.is_market_neutral("MEV Extraction"));
        assert!(catalog.is_trend_filtered("Momentum"));
        assert!(catalog.trend_filtered.iter().all(|s| catalog.strategy(s).is_some()));
    }

    #[test]
    fn every_catalog_strategy_has_a_rule_or_yield_model() {
        for catalog in [Catalog::crypto(), Catalog::quant()] {
            for s in &catalog.strategies {
                assert!(
                    registry::lookup(&s.name).is_some(),
                    "{} has no rule in {}",
                    s.name,
                    catalog.name
                );
            }
        }
    }

    #[test]
    fn trend_filter_keeps_only_strategies_in_the_table() {
        let catalog = Catalog::build(
            "mini",
            &[
                ("Momentum", "Trend", RiskTier::Med),
                ("Fibonacci", "Trend", RiskTier::Med),
            ],
            &[],
        );
        assert_eq!(catalog.trend_filtered.len(), 1);
        assert!(catalog.is_trend_filtered("Momentum"));
        assert!(!catalog.is_trend_filtered("Mean Reversion"));
        assert_eq!(Catalog::quant().trend_filtered.len(), 14);
    }

    #[test]
    fn by_name_resolves_known_catalogs() {
        assert_eq!(Catalog::by_name("crypto").unwrap().name, "crypto");
        assert_eq!(Catalog::by_name(" QUANT ").unwrap().name, "quant");
        assert!(matches!(
            Catalog::by_name("forex"),
            Err(ArenaError::UnknownCatalog(name)) if name == "forex"
        ));
    }

    #[test]
    fn overrides_replace_sets() {
        let catalog = Catalog::crypto()
            .with_tokens(vec!["SOL".into()])
            .with_market_neutral(vec![])
            .with_trend_filtered(vec!["Scalping".into()]);
        assert_eq!(catalog.tokens, vec!["SOL"]);
        assert!(!catalog.is_market_neutral("Basis Trading"));
        assert!(catalog.is_trend_filtered("Scalping"));
        assert!(!catalog.is_trend_filtered("Momentum"));
    }

    #[test]
    fn strategy_lookup() {
        let catalog = Catalog::crypto();
        let s = catalog.strategy("Fear/Greed").unwrap();
        assert_eq!(s.category, "Alt Data");
        assert_eq!(s.risk_tier, RiskTier::Med);
        assert!(catalog.strategy("Nope").is_none());
    }
}
