//! Agent portfolio state and drawdown tracking.

use super::position::Position;

/// Mutable state of one agent's simulation.
///
/// Positions are held in the agent's token preference order; valuation sums
/// them in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub initial_capital: f64,
    pub positions: Vec<Position>,
    pub peak_value: f64,
    pub max_drawdown: f64,
    pub trade_count: u32,
    pub win_count: u32,
    pub loss_count: u32,
}

impl PortfolioState {
    pub fn new<'a>(initial_capital: f64, tokens: impl IntoIterator<Item = &'a str>) -> Self {
        PortfolioState {
            cash: initial_capital,
            initial_capital,
            positions: tokens.into_iter().map(Position::new).collect(),
            peak_value: initial_capital,
            max_drawdown: 0.0,
            trade_count: 0,
            win_count: 0,
            loss_count: 0,
        }
    }

    pub fn position(&self, token: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.token == token)
    }

    /// Cash plus every position marked at `prices`, which are aligned with
    /// `positions`.
    pub fn total_value(&self, prices: &[f64]) -> f64 {
        let held: f64 = self
            .positions
            .iter()
            .zip(prices)
            .map(|(pos, &price)| pos.market_value(price))
            .sum();
        self.cash + held
    }

    /// Update the running peak and maximum drawdown with today's value.
    pub fn record_valuation(&mut self, value: f64) {
        self.peak_value = self.peak_value.max(value);
        if self.peak_value > 0.0 {
            let drawdown = (self.peak_value - value) / self.peak_value;
            self.max_drawdown = self.max_drawdown.max(drawdown);
        }
    }

    /// Count an opening trade.
    pub fn record_entry(&mut self) {
        self.trade_count += 1;
    }

    /// Count a closing trade and its outcome.
    pub fn record_exit(&mut self, win: bool) {
        self.trade_count += 1;
        if win {
            self.win_count += 1;
        } else {
            self.loss_count += 1;
        }
    }

    /// Compound cash by a daily yield fraction, floored at zero. A zero yield
    /// is not a trade.
    pub fn apply_yield(&mut self, daily_return: f64) {
        if daily_return == 0.0 {
            return;
        }
        self.cash = (self.cash + self.cash * daily_return).max(0.0);
        self.record_exit(daily_return > 0.0);
    }

    /// Ratio of current value to the running peak.
    pub fn drawdown_ratio(&self, value: f64) -> f64 {
        value / self.peak_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portfolio() -> PortfolioState {
        PortfolioState::new(1000.0, ["SOL", "BONK"])
    }

    #[test]
    fn new_portfolio() {
        let p = portfolio();
        assert!((p.cash - 1000.0).abs() < f64::EPSILON);
        assert!((p.peak_value - 1000.0).abs() < f64::EPSILON);
        assert_eq!(p.positions.len(), 2);
        assert!(p.position("BONK").is_some());
        assert!(p.position("WIF").is_none());
    }

    #[test]
    fn total_value_marks_positions() {
        let mut p = portfolio();
        p.cash = 500.0;
        p.positions[0].add(2.0, 100.0, 100.0);
        p.positions[1].add(1000.0, 0.1, 0.1);
        assert!((p.total_value(&[150.0, 0.2]) - (500.0 + 300.0 + 200.0)).abs() < 1e-9);
    }

    #[test]
    fn drawdown_tracking_is_monotonic() {
        let mut p = portfolio();
        p.record_valuation(1200.0);
        p.record_valuation(900.0);
        assert!((p.peak_value - 1200.0).abs() < f64::EPSILON);
        assert!((p.max_drawdown - 0.25).abs() < 1e-12);
        p.record_valuation(1100.0);
        assert!((p.max_drawdown - 0.25).abs() < 1e-12);
        p.record_valuation(1300.0);
        assert!((p.peak_value - 1300.0).abs() < f64::EPSILON);
        assert!((p.max_drawdown - 0.25).abs() < 1e-12);
    }

    #[test]
    fn yield_compounds_and_counts() {
        let mut p = portfolio();
        p.apply_yield(0.01);
        assert!((p.cash - 1010.0).abs() < 1e-9);
        p.apply_yield(-0.5);
        assert!((p.cash - 505.0).abs() < 1e-9);
        p.apply_yield(0.0);
        assert_eq!(p.trade_count, 2);
        assert_eq!(p.win_count, 1);
        assert_eq!(p.loss_count, 1);
    }

    #[test]
    fn yield_floors_cash_at_zero() {
        let mut p = portfolio();
        p.apply_yield(-1.5);
        assert_eq!(p.cash, 0.0);
    }

    #[test]
    fn record_entry_counts_trade_only() {
        let mut p = portfolio();
        p.record_entry();
        assert_eq!(p.trade_count, 1);
        assert_eq!(p.win_count + p.loss_count, 0);
    }
}
