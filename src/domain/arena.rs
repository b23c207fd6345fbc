//! Population runner: builds and simulates every agent of an arena.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::domain::agent::create_agent;
use crate::domain::catalog::Catalog;
use crate::domain::market::MarketData;
use crate::domain::simulator::{simulate, SimulationConfig, SimulationResult};

pub const DEFAULT_AGENT_COUNT: u32 = 10_000;
/// Completed agents between progress log lines.
pub const PROGRESS_INTERVAL: usize = 1000;

pub struct ArenaRunner {
    catalog: Catalog,
    config: SimulationConfig,
    parallel: bool,
    /// Worker threads; 0 uses rayon's global pool.
    threads: usize,
}

impl ArenaRunner {
    pub fn new(catalog: Catalog, config: SimulationConfig) -> Self {
        ArenaRunner {
            catalog,
            config,
            parallel: true,
            threads: 0,
        }
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// A count of 1 runs sequentially.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        if threads == 1 {
            self.parallel = false;
        }
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Create and simulate a single agent.
    pub fn run_agent(&self, id: u32, market: &MarketData) -> SimulationResult {
        let mut agent = create_agent(id, &self.catalog);
        simulate(&mut agent, market, &self.catalog, &self.config)
    }

    /// Simulate agents `0..count`. Results are ordered by return descending,
    /// then by agent id, whatever the scheduling.
    pub fn run(&self, count: u32, market: &MarketData) -> Vec<SimulationResult> {
        let started = Instant::now();
        let completed = AtomicUsize::new(0);
        let total = count as usize;

        let simulate_one = |id: u32| {
            let result = self.run_agent(id, market);
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % PROGRESS_INTERVAL == 0 && done < total {
                info!(
                    completed = done,
                    total,
                    elapsed_secs = started.elapsed().as_secs_f64(),
                    "agents processed"
                );
            }
            result
        };

        let mut results: Vec<SimulationResult> = if self.parallel {
            let run_all = || -> Vec<SimulationResult> {
                (0..count).into_par_iter().map(simulate_one).collect()
            };
            match self.pool() {
                Some(pool) => pool.install(run_all),
                None => run_all(),
            }
        } else {
            (0..count).map(simulate_one).collect()
        };

        sort_results(&mut results);
        info!(
            agents = results.len(),
            elapsed_secs = started.elapsed().as_secs_f64(),
            "arena complete"
        );
        results
    }

    fn pool(&self) -> Option<rayon::ThreadPool> {
        if self.threads == 0 {
            return None;
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
        {
            Ok(pool) => Some(pool),
            Err(err) => {
                warn!(error = %err, "falling back to the global thread pool");
                None
            }
        }
    }
}

/// Return descending, ties by agent id ascending.
pub fn sort_results(results: &mut [SimulationResult]) {
    results.sort_by(|a, b| {
        b.return_pct
            .total_cmp(&a.return_pct)
            .then(a.agent.id.cmp(&b.agent.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::Candle;
    use crate::domain::indicator::test_support::make_candles;

    fn wavy(n: usize, base: f64) -> Vec<Candle> {
        let closes: Vec<f64> = (0..n)
            .map(|i| base * (1.0 + 0.1 * (i as f64 / 5.0).sin() + 0.002 * i as f64))
            .collect();
        let mut candles = make_candles(&closes);
        for (i, c) in candles.iter_mut().enumerate() {
            c.high = c.close * 1.02;
            c.low = c.close * 0.98;
            c.volume = 1000.0 + (i % 7) as f64 * 400.0;
        }
        candles
    }

    fn market() -> MarketData {
        MarketData::new(
            ["SOL", "BONK", "WIF", "JUP", "JTO", "RAY"]
                .iter()
                .enumerate()
                .map(|(k, t)| (t.to_string(), wavy(80, 1.0 + k as f64))),
        )
    }

    #[test]
    fn parallel_matches_sequential() {
        let market = market();
        let runner = ArenaRunner::new(Catalog::crypto(), SimulationConfig::default());
        let parallel = runner.run(64, &market);
        let runner = runner.with_parallelism(false);
        let sequential = runner.run(64, &market);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn results_sorted_by_return() {
        let results =
            ArenaRunner::new(Catalog::crypto(), SimulationConfig::default()).run(40, &market());
        assert_eq!(results.len(), 40);
        for pair in results.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.return_pct > b.return_pct
                    || (a.return_pct == b.return_pct && a.agent.id < b.agent.id)
            );
        }
    }

    #[test]
    fn dedicated_pool_matches_global() {
        let market = market();
        let global = ArenaRunner::new(Catalog::quant(), SimulationConfig::default()).run(24, &market);
        let pooled = ArenaRunner::new(Catalog::quant(), SimulationConfig::default())
            .with_threads(2)
            .run(24, &market);
        assert_eq!(global, pooled);
    }

    #[test]
    fn run_agent_matches_population_entry() {
        let market = market();
        let runner = ArenaRunner::new(Catalog::crypto(), SimulationConfig::default());
        let results = runner.run(10, &market);
        let single = runner.run_agent(7, &market);
        let from_run = results.iter().find(|r| r.agent.id == 7).unwrap();
        assert_eq!(&single, from_run);
    }

    #[test]
    fn zero_agents() {
        let results =
            ArenaRunner::new(Catalog::crypto(), SimulationConfig::default()).run(0, &market());
        assert!(results.is_empty());
    }
}
