//! Integration tests for the arena pipeline.
//!
//! Tests cover:
//! - Loading a market through a mock data port and running the arena
//! - Determinism across runs and scheduling modes
//! - Partial universes (some tokens skipped, others traded)
//! - Aggregation over a real population
//! - Report generation into a temporary directory
//! - Portfolio invariants over random price series (proptest)

mod common;

use agent_arena::adapters::json_report_adapter::JsonReportAdapter;
use agent_arena::adapters::markdown_report_adapter::MarkdownReportAdapter;
use agent_arena::domain::aggregate::Aggregate;
use agent_arena::domain::agent::create_agent;
use agent_arena::domain::arena::ArenaRunner;
use agent_arena::domain::catalog::Catalog;
use agent_arena::domain::error::ArenaError;
use agent_arena::domain::market::MarketData;
use agent_arena::domain::simulator::{SimulationConfig, SimulationResult};
use agent_arena::domain::universe::{SkipReason, load_market};
use agent_arena::ports::report_port::{ArenaReport, ReportPort, RunMeta};
use approx::assert_relative_eq;
use common::*;
use proptest::prelude::*;

fn tokens() -> Vec<String> {
    TOKENS.iter().map(|t| t.to_string()).collect()
}

fn market_from(port: &MockDataPort) -> MarketData {
    load_market(port, &tokens(), SimulationConfig::default().min_candles)
        .unwrap()
        .market
}

fn runner() -> ArenaRunner {
    ArenaRunner::new(Catalog::crypto(), SimulationConfig::default())
}

mod arena_pipeline {
    use super::*;

    #[test]
    fn every_agent_produces_a_result() {
        let market = market_from(&MockDataPort::full_universe(90, wave));
        let results = runner().run(200, &market);

        assert_eq!(results.len(), 200);
        let mut ids: Vec<u32> = results.iter().map(|r| r.agent.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..200).collect::<Vec<_>>());
        assert!(
            results
                .windows(2)
                .all(|w| w[0].return_pct >= w[1].return_pct)
        );
    }

    #[test]
    fn idle_agents_keep_their_capital() {
        let market = market_from(&MockDataPort::full_universe(60, flat));
        let results = runner().run(150, &market);
        for r in results.iter().filter(|r| r.trade_count == 0) {
            assert_relative_eq!(r.final_value, 1000.0);
            assert_relative_eq!(r.return_pct, 0.0);
            assert_relative_eq!(r.max_drawdown_pct, 0.0);
        }
    }

    #[test]
    fn uptrend_rewards_trend_followers() {
        let market = market_from(&MockDataPort::full_universe(120, uptrend));
        let results = runner().run(400, &market);
        let trend_followers: Vec<&SimulationResult> = results
            .iter()
            .filter(|r| r.agent.primary_strategy == "Position Trading" && r.trade_count > 0)
            .collect();
        assert!(!trend_followers.is_empty());
        assert!(trend_followers.iter().all(|r| r.return_pct > 0.0));
    }

    #[test]
    fn golden_agent_zero_profile() {
        let agent = create_agent(0, &Catalog::crypto());
        assert_eq!(agent.profile.seed, 0);
        assert_eq!(agent.profile.primary_strategy, "Concentrated LP");
        assert_eq!(agent.profile.secondary_strategy, "MEV Extraction");
        assert_eq!(agent.profile.preferred_tokens, vec!["SOL", "BONK"]);
    }
}

mod determinism {
    use super::*;

    #[test]
    fn repeated_runs_are_identical() {
        let market = market_from(&MockDataPort::full_universe(80, wave));
        let first = runner().run(120, &market);
        let second = runner().run(120, &market);
        assert_eq!(first, second);
    }

    #[test]
    fn scheduling_does_not_change_results() {
        let market = market_from(&MockDataPort::full_universe(80, wave));
        let parallel = runner().run(120, &market);
        let sequential = runner().with_parallelism(false).run(120, &market);
        let pooled = runner().with_threads(3).run(120, &market);
        assert_eq!(parallel, sequential);
        assert_eq!(parallel, pooled);
    }

    #[test]
    fn single_agent_matches_population_entry() {
        let market = market_from(&MockDataPort::full_universe(80, wave));
        let population = runner().run(50, &market);
        let solo = runner().run_agent(17, &market);
        let entry = population.iter().find(|r| r.agent.id == 17).unwrap();
        assert_eq!(&solo, entry);
    }
}

mod partial_universe {
    use super::*;

    #[test]
    fn short_and_missing_tokens_are_skipped() {
        let port = MockDataPort::full_universe(60, wave)
            .with_candles("WIF", candles_from_closes(&[1.0; 10]))
            .with_missing("JUP");
        let loaded = load_market(&port, &tokens(), 30).unwrap();

        assert_eq!(loaded.market.len(), 4);
        assert!(loaded.market.get("WIF").is_none());
        assert!(loaded.skipped.iter().any(|s| s.token == "WIF"
            && s.reason == SkipReason::InsufficientCandles { candles: 10 }));
        assert!(loaded
            .skipped
            .iter()
            .any(|s| s.token == "JUP" && s.reason == SkipReason::NoData));
    }

    #[test]
    fn malformed_token_data_aborts_the_load() {
        let port = MockDataPort::full_universe(60, wave).with_error("SOL", "bad json");
        let err = load_market(&port, &tokens(), 30).unwrap_err();
        assert!(matches!(
            err,
            ArenaError::DataFormat { ref source_name, ref reason }
                if source_name == "SOL" && reason == "bad json"
        ));
        let code = std::process::ExitCode::from(&err);
        assert_eq!(format!("{code:?}"), format!("{:?}", std::process::ExitCode::from(3)));
    }

    #[test]
    fn agents_without_usable_tokens_are_degenerate() {
        let port = MockDataPort::new().with_candles("RAY", candles_from_closes(&[5.0; 40]));
        let market = market_from(&port);
        let results = runner().run(100, &market);
        for r in results
            .iter()
            .filter(|r| !r.agent.preferred_tokens.iter().any(|t| t == "RAY"))
        {
            assert_eq!(r.trade_count, 0);
            assert_relative_eq!(r.final_value, 1000.0);
        }
    }

    #[test]
    fn empty_universe_is_an_error() {
        let port = MockDataPort::new().with_candles("SOL", candles_from_closes(&[1.0; 5]));
        let err = load_market(&port, &tokens(), 30).unwrap_err();
        assert!(matches!(
            err,
            ArenaError::InsufficientData { ref token, candles: 5, minimum: 30 } if token == "SOL"
        ));

        let err = load_market(&MockDataPort::new(), &tokens(), 30).unwrap_err();
        assert!(matches!(err, ArenaError::NoData { ref path } if path == "mock"));
    }
}

mod aggregation {
    use super::*;

    #[test]
    fn summary_totals_match_results() {
        let market = market_from(&MockDataPort::full_universe(90, wave));
        let results = runner().run(300, &market);
        let agg = Aggregate::from_results(&results);
        let s = &agg.summary;

        assert_eq!(s.agents, 300);
        assert_eq!(s.profitable + s.unprofitable, 300);
        assert_relative_eq!(s.total_capital, 300_000.0);
        let total: f64 = results.iter().map(|r| r.final_value).sum();
        assert_relative_eq!(s.total_final_value, total, epsilon = 1e-6);
        assert_eq!(s.best.as_ref().unwrap().id, results[0].agent.id);
        assert_eq!(s.worst.as_ref().unwrap().id, results[299].agent.id);

        let grouped: usize = agg.by_strategy.iter().map(|g| g.count).sum();
        assert_eq!(grouped, 300);
        assert!(
            agg.by_strategy
                .windows(2)
                .all(|w| w[0].avg_return_pct >= w[1].avg_return_pct)
        );
        assert!(agg.by_aggression.len() <= 5);
        assert!(agg.by_risk_tier.len() <= 4);
    }
}

mod report_generation {
    use super::*;

    #[test]
    fn both_reports_written() {
        let market = market_from(&MockDataPort::full_universe(60, wave));
        let results = runner().run(40, &market);
        let aggregate = Aggregate::from_results(&results);
        let context = market.context();
        let meta = RunMeta {
            date: date(2025, 3, 1),
            start_date: Some(date(2024, 1, 1)),
            end_date: Some(date(2024, 2, 29)),
            total_agents: results.len(),
            initial_capital: 1000.0,
            catalog: "crypto".into(),
            trade_fee: 0.001,
            slippage: 0.0005,
            max_position_pct: 0.25,
        };
        let report = ArenaReport {
            meta: &meta,
            market: &context,
            results: &results,
            aggregate: &aggregate,
        };

        let dir = tempfile::TempDir::new().unwrap();
        let md = MarkdownReportAdapter::default()
            .write(&report, dir.path())
            .unwrap();
        let json = JsonReportAdapter::default()
            .write(&report, dir.path())
            .unwrap();

        let md = std::fs::read_to_string(md).unwrap();
        assert!(md.contains("**Data Period:** 2024-01-01 to 2024-02-29 (~60 days)"));
        assert!(md.contains("## Top 20 Agents"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(json).unwrap()).unwrap();
        assert_eq!(json["top"].as_array().unwrap().len(), 40);
        assert_eq!(json["bottom"].as_array().unwrap().len(), 20);
        assert_eq!(json["market"].as_array().unwrap().len(), 6);
    }
}

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.85f64..1.15, 30..70).prop_map(|steps| {
        steps
            .iter()
            .scan(100.0, |price, step| {
                *price = (*price * step).max(0.01);
                Some(*price)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn portfolio_invariants_hold(
        sol in arb_closes(),
        bonk in arb_closes(),
        id in 0u32..5_000,
        quant in any::<bool>(),
    ) {
        let market = MarketData::new([
            ("SOL".to_string(), candles_from_closes(&sol)),
            ("BONK".to_string(), candles_from_closes(&bonk)),
        ]);
        let runner = || {
            let catalog = if quant { Catalog::quant() } else { Catalog::crypto() };
            ArenaRunner::new(catalog, SimulationConfig::default())
        };
        let r = runner().run_agent(id, &market);

        prop_assert!(r.final_value >= 0.0);
        prop_assert!(r.return_pct >= -100.0);
        prop_assert!((0.0..=100.0).contains(&r.max_drawdown_pct));
        prop_assert!((0.0..=100.0).contains(&r.win_rate));
        prop_assert!(r.win_count + r.loss_count <= r.trade_count);
        if r.trade_count == 0 {
            prop_assert_eq!(r.final_value, 1000.0);
        }

        let again = runner().run_agent(id, &market);
        prop_assert_eq!(r, again);
    }
}

#[test]
fn quant_population_runs_on_volatile_market() {
    let market = market_from(&MockDataPort::full_universe(90, wave));
    let runner = ArenaRunner::new(Catalog::quant(), SimulationConfig::default());
    let results = runner.run(300, &market);

    assert_eq!(results.len(), 300);
    assert!(results.iter().any(|r| r.trade_count > 0));
    for r in &results {
        assert!(r.final_value >= 0.0);
        assert!((0.0..=100.0).contains(&r.max_drawdown_pct));
        assert!(Catalog::quant().strategy(&r.agent.primary_strategy).is_some());
    }
}
