//! Agent trait profiles and the agent factory.
//!
//! An agent is derived entirely from its integer id: the id is hashed into a
//! 32-bit seed, a [`DeterministicStream`] is built from it, and every trait is
//! drawn from that stream in a fixed order. The stream is handed back with
//! the profile and keeps advancing during simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::catalog::Catalog;
use crate::domain::rng::DeterministicStream;
use crate::domain::strategy::RiskTier;

const SEED_MULTIPLIER: u32 = 2_654_435_761;

pub const NAME_PREFIXES: [&str; 32] = [
    "ALPHA", "BETA", "DELTA", "SIGMA", "OMEGA", "NEXUS", "FLUX", "VOID", "APEX", "GHOST", "CYBER",
    "NEON", "TURBO", "BLITZ", "IRON", "STORM", "PULSE", "ZERO", "HYPER", "ROGUE", "SHADE",
    "SPARK", "DRIFT", "CORE", "WAVE", "ECHO", "VIPER", "TITAN", "ATLAS", "PRIME", "ONYX", "HELIX",
];

pub const NAME_SUFFIXES: [&str; 16] = [
    "", "_X", "_V2", "_PRO", "_MAX", "_LITE", "_9000", "_AI", "_BOT", "_DAO", "_SOL", "", "", "",
    "", "",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeHorizon {
    Scalper,
    #[serde(rename = "Day Trader")]
    DayTrader,
    #[serde(rename = "Swing Trader")]
    SwingTrader,
    #[serde(rename = "Position Trader")]
    PositionTrader,
    #[serde(rename = "Long-Term Holder")]
    LongTermHolder,
}

impl TimeHorizon {
    pub const ALL: [TimeHorizon; 5] = [
        TimeHorizon::Scalper,
        TimeHorizon::DayTrader,
        TimeHorizon::SwingTrader,
        TimeHorizon::PositionTrader,
        TimeHorizon::LongTermHolder,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeHorizon::Scalper => "Scalper",
            TimeHorizon::DayTrader => "Day Trader",
            TimeHorizon::SwingTrader => "Swing Trader",
            TimeHorizon::PositionTrader => "Position Trader",
            TimeHorizon::LongTermHolder => "Long-Term Holder",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskStyle {
    #[serde(rename = "Kelly Criterion")]
    KellyCriterion,
    #[serde(rename = "Fixed Fractional")]
    FixedFractional,
    #[serde(rename = "Risk Parity")]
    RiskParity,
    #[serde(rename = "Trailing Stops")]
    TrailingStops,
    Pyramiding,
    #[serde(rename = "Anti-Martingale")]
    AntiMartingale,
    Conservative,
}

impl RiskStyle {
    pub const ALL: [RiskStyle; 7] = [
        RiskStyle::KellyCriterion,
        RiskStyle::FixedFractional,
        RiskStyle::RiskParity,
        RiskStyle::TrailingStops,
        RiskStyle::Pyramiding,
        RiskStyle::AntiMartingale,
        RiskStyle::Conservative,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RiskStyle::KellyCriterion => "Kelly Criterion",
            RiskStyle::FixedFractional => "Fixed Fractional",
            RiskStyle::RiskParity => "Risk Parity",
            RiskStyle::TrailingStops => "Trailing Stops",
            RiskStyle::Pyramiding => "Pyramiding",
            RiskStyle::AntiMartingale => "Anti-Martingale",
            RiskStyle::Conservative => "Conservative",
        }
    }

    /// Multiplier applied to the aggression base fraction when sizing entries.
    pub fn size_multiplier(self) -> f64 {
        match self {
            RiskStyle::KellyCriterion => 1.0,
            RiskStyle::FixedFractional => 0.8,
            RiskStyle::RiskParity => 0.7,
            RiskStyle::TrailingStops => 0.9,
            RiskStyle::Pyramiding => 1.2,
            RiskStyle::AntiMartingale => 0.9,
            RiskStyle::Conservative => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Aggression {
    #[serde(rename = "Ultra-Conservative")]
    UltraConservative,
    Conservative,
    Moderate,
    Aggressive,
    Degen,
}

impl Aggression {
    pub const ALL: [Aggression; 5] = [
        Aggression::UltraConservative,
        Aggression::Conservative,
        Aggression::Moderate,
        Aggression::Aggressive,
        Aggression::Degen,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Aggression::UltraConservative => "Ultra-Conservative",
            Aggression::Conservative => "Conservative",
            Aggression::Moderate => "Moderate",
            Aggression::Aggressive => "Aggressive",
            Aggression::Degen => "Degen",
        }
    }

    /// Fraction of portfolio value committed to a full-confidence entry.
    pub fn base_position_fraction(self) -> f64 {
        match self {
            Aggression::UltraConservative => 0.03,
            Aggression::Conservative => 0.06,
            Aggression::Moderate => 0.10,
            Aggression::Aggressive => 0.18,
            Aggression::Degen => 0.25,
        }
    }

    /// Scale applied to market-neutral yield.
    pub fn yield_multiplier(self) -> f64 {
        match self {
            Aggression::UltraConservative => 0.5,
            Aggression::Conservative => 0.7,
            Aggression::Moderate => 1.0,
            Aggression::Aggressive => 1.3,
            Aggression::Degen => 1.5,
        }
    }
}

macro_rules! display_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_label!(TimeHorizon, RiskStyle, Aggression);

/// Immutable trait profile of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    pub id: u32,
    pub seed: u32,
    pub name: String,
    pub primary_index: usize,
    pub secondary_index: usize,
    pub primary_strategy: String,
    pub secondary_strategy: String,
    pub category: String,
    pub risk_tier: RiskTier,
    pub time_horizon: TimeHorizon,
    pub risk_style: RiskStyle,
    pub aggression: Aggression,
    pub preferred_tokens: Vec<String>,
}

/// A profile together with the stream it was drawn from.
#[derive(Debug, Clone)]
pub struct Agent {
    pub profile: AgentProfile,
    pub stream: DeterministicStream,
}

pub fn agent_seed(id: u32) -> u32 {
    id.wrapping_mul(SEED_MULTIPLIER)
}

/// Build the agent for `id` against `catalog`.
///
/// Draw order: primary strategy, secondary strategy, time horizon, risk
/// style, aggression, token count, token shuffle, name prefix, name suffix.
pub fn create_agent(id: u32, catalog: &Catalog) -> Agent {
    let seed = agent_seed(id);
    let mut stream = DeterministicStream::new(seed);

    let primary_index = stream.next_index(catalog.strategies.len());
    let secondary_index = stream.next_index(catalog.strategies.len());
    let time_horizon = TimeHorizon::ALL[stream.next_index(TimeHorizon::ALL.len())];
    let risk_style = RiskStyle::ALL[stream.next_index(RiskStyle::ALL.len())];
    let aggression = Aggression::ALL[stream.next_index(Aggression::ALL.len())];
    let token_count = 1 + stream.next_index(3);

    let mut universe = catalog.tokens.clone();
    comparator_shuffle(&mut universe, &mut stream);
    universe.truncate(token_count);

    let prefix = NAME_PREFIXES[stream.next_index(NAME_PREFIXES.len())];
    let suffix = NAME_SUFFIXES[stream.next_index(NAME_SUFFIXES.len())];

    let primary = &catalog.strategies[primary_index];
    let secondary = &catalog.strategies[secondary_index];

    let profile = AgentProfile {
        id,
        seed,
        name: format!("{prefix}{suffix}"),
        primary_index,
        secondary_index,
        primary_strategy: primary.name.clone(),
        secondary_strategy: secondary.name.clone(),
        category: primary.category.clone(),
        risk_tier: primary.risk_tier,
        time_horizon,
        risk_style,
        aggression,
        preferred_tokens: universe,
    };
    tracing::trace!(id, name = %profile.name, draws = stream.draws(), "agent created");

    Agent { profile, stream }
}

/// Shuffle by sorting with a comparator that ignores its operands and answers
/// "less" whenever the next draw is below one half.
///
/// Follows the short-array path of a TimSort: the leading run is measured
/// (and reversed when descending), then the remainder is placed by binary
/// insertion. Draw consumption depends on the draws themselves.
fn comparator_shuffle<T>(items: &mut [T], stream: &mut DeterministicStream) {
    let len = items.len();
    if len < 2 {
        return;
    }
    let mut less = || stream.next_f64() < 0.5;

    let mut run = 2;
    let descending = less();
    while run < len {
        let order_less = less();
        if descending != order_less {
            break;
        }
        run += 1;
    }
    if descending {
        items[..run].reverse();
    }

    for start in run..len {
        let mut left = 0;
        let mut right = start;
        while left < right {
            let mid = left + ((right - left) >> 1);
            if less() {
                right = mid;
            } else {
                left = mid + 1;
            }
        }
        items[left..=start].rotate_right(1);
    }
}
