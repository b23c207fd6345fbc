//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod json_adapter;
pub mod json_report_adapter;
pub mod markdown_report_adapter;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::domain::aggregate::Aggregate;
    use crate::domain::arena::ArenaRunner;
    use crate::domain::catalog::Catalog;
    use crate::domain::indicator::test_support::make_candles;
    use crate::domain::market::{MarketData, TokenContext};
    use crate::domain::simulator::{SimulationConfig, SimulationResult};
    use crate::ports::report_port::{ArenaReport, RunMeta};

    /// Owned pieces of a small arena run over a wavy six-token market.
    pub struct SampleRun {
        pub meta: RunMeta,
        pub market: Vec<TokenContext>,
        pub results: Vec<SimulationResult>,
        pub aggregate: Aggregate,
    }

    impl SampleRun {
        pub fn new(agents: u32) -> Self {
            let catalog = Catalog::crypto();
            let series = catalog.tokens.iter().enumerate().map(|(k, token)| {
                let prices: Vec<f64> = (0..60)
                    .map(|i| {
                        let t = i as f64;
                        100.0 + 10.0 * (t / (4.0 + k as f64)).sin() + t * 0.2 * k as f64
                    })
                    .collect();
                (token.clone(), make_candles(&prices))
            });
            let market = MarketData::new(series);
            let config = SimulationConfig::default();
            let runner = ArenaRunner::new(catalog, config.clone()).with_parallelism(false);
            let results = runner.run(agents, &market);
            let aggregate = Aggregate::from_results(&results);
            let context = market.context();
            let meta = RunMeta {
                date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                start_date: context.iter().map(|c| c.start_date).min(),
                end_date: context.iter().map(|c| c.end_date).max(),
                total_agents: results.len(),
                initial_capital: config.initial_capital,
                catalog: "crypto".to_string(),
                trade_fee: config.execution.trade_fee,
                slippage: config.execution.slippage,
                max_position_pct: config.execution.max_position_pct,
            };
            SampleRun {
                meta,
                market: context,
                results,
                aggregate,
            }
        }

        pub fn report(&self) -> ArenaReport<'_> {
            ArenaReport {
                meta: &self.meta,
                market: &self.market,
                results: &self.results,
                aggregate: &self.aggregate,
            }
        }
    }
}
